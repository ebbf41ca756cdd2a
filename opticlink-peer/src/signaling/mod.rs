mod signaling_channel;
mod signaling_event;
mod signaling_output;

pub use signaling_channel::SignalingChannel;
pub use signaling_event::SignalingEvent;
pub use signaling_output::SignalingOutput;
