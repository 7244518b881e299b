use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::activity::Activity;

/// Chooses an index in `0..len`. Production code draws uniformly at random;
/// tests pin the choice with a closure.
pub trait IndexPicker {
    fn pick(&mut self, len: usize) -> usize;
}

impl<F> IndexPicker for F
where
    F: FnMut(usize) -> usize,
{
    fn pick(&mut self, len: usize) -> usize {
        self(len)
    }
}

pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexPicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StaticActivity {
    pub title: &'static str,
    pub description: &'static str,
}

impl StaticActivity {
    pub fn to_activity(self) -> Activity {
        Activity::new(self.title, self.description)
    }
}

/// Fixed set of canned activities used when generation is unavailable.
#[derive(Debug, Clone, Copy)]
pub struct StaticPool {
    name: &'static str,
    entries: &'static [StaticActivity],
}

impl StaticPool {
    pub const fn new(name: &'static str, entries: &'static [StaticActivity]) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns an owned copy of a picked entry. An out-of-range pick yields
    /// the last-resort street performance.
    pub fn pick(&self, picker: &mut dyn IndexPicker) -> Activity {
        let index = picker.pick(self.len());
        tracing::debug!(pool = self.name, index, "picked canned activity");
        self.entries
            .get(index)
            .copied()
            .unwrap_or(LAST_RESORT)
            .to_activity()
    }
}

pub const LAST_RESORT: StaticActivity = StaticActivity {
    title: "Street Performance",
    description: "Find a busy public area and perform a simple talent for 2 minutes. It could be singing, dancing, or even reciting a poem. Notice how it feels to be watched by strangers.",
};

/// Used by the activity source when the model cannot be reached or understood.
pub const SOURCE_FALLBACKS: StaticPool = StaticPool::new(
    "source",
    &[
        StaticActivity {
            title: "Reverse Order Day",
            description: "Do your normal routine completely backwards today. Start with dinner foods for breakfast, say goodbye when meeting people, and end your day with a morning ritual.",
        },
        StaticActivity {
            title: "Random Accent Hour",
            description: "Speak in a made-up accent for one hour in public. Commit fully to the character and see how people respond differently to you.",
        },
        StaticActivity {
            title: "Five Compliments Challenge",
            description: "Give five genuine compliments to complete strangers today. Notice how it makes you feel and how they react to unexpected kindness.",
        },
    ],
);

/// Used by the interaction controller once its retry budget is spent.
pub const CONTROLLER_FALLBACKS: StaticPool = StaticPool::new(
    "controller",
    &[
        StaticActivity {
            title: "High Five a Stranger",
            description: "Find a friendly-looking stranger in a public place and offer them a high five. Smile and say 'Happy Tuesday!' (or whatever day it is).",
        },
        StaticActivity {
            title: "Explore a New Building",
            description: "Walk into a building you've never been in before. It could be a hotel lobby, a university building, or an office tower. Spend 10 minutes exploring and notice three interesting details.",
        },
        StaticActivity {
            title: "Random Bus Adventure",
            description: "Get on the next bus that arrives at your nearest stop. Ride for 3 stops, get off, and find something interesting in that neighborhood.",
        },
        StaticActivity {
            title: "Compliment Chain",
            description: "Give genuine compliments to three strangers in a row. Notice how it makes you feel and how they react.",
        },
        StaticActivity {
            title: "Reverse Shopping",
            description: "Go to a store and ask an employee to recommend their favorite item under $10. Buy it without questioning their choice.",
        },
    ],
);
