use bevy_ecs::message::Message;

/// Sound requests written by gameplay systems.
///
/// Forwarded to the [`SoundController`](crate::resources::soundcontroller::SoundController)
/// by [`forward_sound_requests`](crate::systems::sound::forward_sound_requests).
/// Play requests are rate limited; stop requests always go through.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum SoundRequest {
    PlayFx { id: String },
    PlayMusic { id: String, looped: bool },
    StopMusic { id: String },
}
