pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod player;
pub mod power;
pub mod transport;
pub mod wave;
pub mod waveform;


pub use config::{DeviceSettings, MacAddress, PowerConfig, WifiCredentials};
pub use error::CoyoteError;
pub use frame::parse_hex_frame;
pub use player::{Playback, Player};
pub use power::PowerFrame;
pub use transport::{Channel, Characteristic, RecordingTransport, Transport};
pub use wave::WaveformStep;
pub use waveform::{Waveform, WaveformLibrary};
