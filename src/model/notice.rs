#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeVariant {
    Info,
    Destructive,
}

/// A short message surfaced to the user as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    fn new(title: &str, description: &str, variant: NoticeVariant) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            variant,
        }
    }

    pub fn trying_again() -> Self {
        Self::new(
            "Trying again",
            "The first attempt didn't work. Trying one more time...",
            NoticeVariant::Info,
        )
    }

    pub fn using_fallback() -> Self {
        Self::new(
            "Using fallback activity",
            "We couldn't generate a new activity after multiple attempts. Here's one from our collection instead.",
            NoticeVariant::Destructive,
        )
    }

    pub fn something_went_wrong() -> Self {
        Self::new(
            "Something went wrong",
            "Couldn't generate a new activity. Using one from our collection instead.",
            NoticeVariant::Destructive,
        )
    }

    pub fn copied() -> Self {
        Self::new(
            "Copied to clipboard!",
            "Now you can paste and send to your friends.",
            NoticeVariant::Info,
        )
    }

    pub fn copy_failed() -> Self {
        Self::new(
            "Couldn't copy to clipboard",
            "Try selecting and copying the text manually.",
            NoticeVariant::Destructive,
        )
    }
}
