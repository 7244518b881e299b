use serde::{Deserialize, Serialize};

/// Words that already signal a group activity; descriptions containing any of
/// them are left alone when phrasing for multiplayer.
const GROUP_MARKERS: [&str; 4] = ["people", "friends", "partners", "together"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub title: String,
    pub description: String,
}

impl Activity {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Both fields must carry text for the activity to be shown.
    pub fn is_usable(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }

    pub fn share_text(&self) -> String {
        format!(
            "Try this spontaneous activity: \"{}\" - {}",
            self.title, self.description
        )
    }

    /// Returns a copy phrased for `players` people, unless the description
    /// already talks about a group.
    pub fn for_group(&self, players: u8) -> Activity {
        let lower = self.description.to_lowercase();
        if GROUP_MARKERS.iter().any(|marker| lower.contains(marker)) {
            return self.clone();
        }

        Activity {
            title: self.title.clone(),
            description: format!("With {players} people: {}", self.description),
        }
    }
}
