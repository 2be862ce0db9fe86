//! Audio/Video domain modules.

pub mod audio_stream;
pub mod compositor;
pub mod stream;
pub mod video_stream;
pub mod workspace;
