pub mod upload;

pub use upload::{read_audio_field, AudioUpload};
