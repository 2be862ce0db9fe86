//! Adapters - Concrete implementations of ports, plus the HTTP inbound side.

pub mod ffmpeg;
pub mod google;
pub mod http;
pub mod mock_audio;
pub mod source;
