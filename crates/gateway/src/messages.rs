//! Acknowledgement messages shown while media is being handled.

use rand::seq::SliceRandom;

/// Which media step is being acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    ImageUpload,
    ImageCreate,
    ImageAnalysis,
    VideoUpload,
    VideoAnalysis,
}

const IMAGE_UPLOAD: &[&str] = &[
    "Thank you for your image upload! Let me take a look at it.",
    "Got your image! Analyzing it now...",
    "Image received. I'll check it out for you.",
    "Thanks for sharing the image! Let me review it.",
    "Your image is in! Let me see what I can find.",
];

const IMAGE_CREATE: &[&str] = &[
    "Hold on while I create the image...",
    "Creating your image now, please wait...",
    "Working on generating your image...",
    "Let me create that image for you...",
    "Image creation in progress...",
];

const IMAGE_ANALYSIS: &[&str] = &[
    "I've analyzed the image. Here's what I found:",
    "Image analysis complete!",
    "Done reviewing your image.",
    "I've taken a look at your image.",
    "Image processed!",
];

const VIDEO_UPLOAD: &[&str] = &[
    "Thank you for your video upload! Let me take a look at it.",
    "Got your video! Analyzing it now...",
    "Video received. I'll check it out for you.",
    "Thanks for sharing the video! Let me review it.",
    "Your video is in! Let me see what I can find.",
];

const VIDEO_ANALYSIS: &[&str] = &[
    "I've analyzed the video. Here's what I found:",
    "Video analysis complete!",
    "Done reviewing your video.",
    "I've taken a look at your video.",
    "Video processed!",
];

impl StatusKind {
    /// Every message that may be shown for this step.
    pub fn pool(&self) -> &'static [&'static str] {
        match self {
            Self::ImageUpload => IMAGE_UPLOAD,
            Self::ImageCreate => IMAGE_CREATE,
            Self::ImageAnalysis => IMAGE_ANALYSIS,
            Self::VideoUpload => VIDEO_UPLOAD,
            Self::VideoAnalysis => VIDEO_ANALYSIS,
        }
    }
}

/// A random message from the pool of `kind`.
pub fn rotating_message(kind: StatusKind) -> &'static str {
    kind.pool()
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
}
