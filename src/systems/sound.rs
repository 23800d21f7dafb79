//! Systems bridging ECS sound requests with the sound dispatch worker.
//!
//! - [`update_sound_requests`] advances the `Messages<SoundRequest>` queue so
//!   requests written last frame become readable.
//! - [`forward_sound_requests`] hands each request to the
//!   [`SoundController`], which rate-limits it and queues it for the worker.
//!
//! Both are generic over the backend type; register them with the concrete
//! backend, e.g. `forward_sound_requests::<LogSoundEngine>`.

use bevy_ecs::prelude::*;
use log::debug;

use crate::events::sound::SoundRequest;
use crate::resources::soundcontroller::SoundController;
use crate::resources::soundengine::SoundEngine;

/// Advance the ECS message queue for SoundRequest so same-frame readers can observe writes.
pub fn update_sound_requests(mut msgs: ResMut<Messages<SoundRequest>>) {
    msgs.update();
}

/// Forward SoundRequest messages to the sound controller.
pub fn forward_sound_requests<B: SoundEngine + 'static>(
    controller: Res<SoundController<B>>,
    mut reader: MessageReader<SoundRequest>,
) {
    for request in reader.read() {
        match request.clone() {
            SoundRequest::PlayFx { id } => {
                if !controller.call(move |engine: &mut B| engine.play_fx(&id)) {
                    debug!("sound request throttled: {:?}", request);
                }
            }
            SoundRequest::PlayMusic { id, looped } => {
                if !controller.call(move |engine: &mut B| engine.play_music(&id, looped)) {
                    debug!("sound request throttled: {:?}", request);
                }
            }
            SoundRequest::StopMusic { id } => {
                controller.call_ignore_timeout(move |engine: &mut B| engine.stop_music(&id), true);
            }
        }
    }
}
