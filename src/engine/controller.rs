use std::time::{Duration, Instant};

use crate::engine::activity_source::SourcedActivity;
use crate::engine::clipboard::ClipboardSink;
use crate::model::activity::Activity;
use crate::model::notice::Notice;
use crate::model::session::{GameMode, InteractionSnapshot, PlayerCount};
use crate::model::static_pool::{IndexPicker, CONTROLLER_FALLBACKS};

/// One initial attempt plus one automatic retry.
pub const MAX_ATTEMPTS: u8 = 2;

/// How long the "copied" confirmation stays visible.
pub const CONFIRMATION_WINDOW: Duration = Duration::from_secs(2);

pub enum SourceReply {
    Delivered(SourcedActivity),
    /// The provider ran but has nothing to show.
    LogicalFailure { reason: String },
}

/// Where the controller gets activities from. `Err` means something broke
/// unexpectedly, as opposed to a reported logical failure.
pub trait ActivityProvider {
    fn fetch(&mut self) -> anyhow::Result<SourceReply>;
}

/// Owns the per-session interaction state and the retry policy around an
/// [`ActivityProvider`].
pub struct InteractionController<P, K> {
    provider: P,
    picker: K,

    current: Option<Activity>,
    busy: bool,
    retry_count: u8,
    mode: GameMode,
    players: PlayerCount,

    copied_until: Option<Instant>,
    confirmation_window: Duration,
}

impl<P, K> InteractionController<P, K>
where
    P: ActivityProvider,
    K: IndexPicker,
{
    pub fn new(provider: P, picker: K) -> Self {
        Self {
            provider,
            picker,
            current: None,
            busy: false,
            retry_count: 0,
            mode: GameMode::default(),
            players: PlayerCount::default(),
            copied_until: None,
            confirmation_window: CONFIRMATION_WINDOW,
        }
    }

    pub fn snapshot(&self) -> InteractionSnapshot {
        InteractionSnapshot {
            current: self.current.clone(),
            busy: self.busy,
            retry_count: self.retry_count,
            mode: self.mode,
            players: self.players,
            copied: self.copied_until.is_some(),
        }
    }

    pub fn current(&self) -> Option<&Activity> {
        self.current.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn retry_count(&self) -> u8 {
        self.retry_count
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
    }

    pub fn set_player_count(&mut self, count: u8) {
        self.players = PlayerCount::new(count);
    }

    pub fn increment_players(&mut self) {
        self.players.increment();
    }

    pub fn decrement_players(&mut self) {
        self.players.decrement();
    }

    /// Fetch a new activity, retrying a logical failure once before
    /// settling on a canned one. Returns the notices to show, in order.
    pub fn request_new_activity(&mut self) -> Vec<Notice> {
        if self.busy {
            tracing::warn!("activity request already in flight, ignoring");
            return Vec::new();
        }
        self.busy = true;

        let mut notices = Vec::new();
        let mut attempt: u8 = 1;

        let activity = loop {
            let failure = match self.provider.fetch() {
                Ok(SourceReply::Delivered(sourced)) if sourced.activity.is_usable() => {
                    tracing::info!(origin = sourced.origin.as_str(), attempt, "activity ready");
                    if let Some(error) = sourced.error {
                        tracing::debug!(error, "source reported a soft error");
                    }
                    break self.phrase(sourced.activity);
                }
                Ok(SourceReply::Delivered(_)) => "source delivered an empty activity".to_string(),
                Ok(SourceReply::LogicalFailure { reason }) => reason,
                Err(err) => {
                    tracing::error!(attempt, "activity request failed unexpectedly: {err:#}");
                    notices.push(Notice::something_went_wrong());
                    let fallback = CONTROLLER_FALLBACKS.pick(&mut self.picker);
                    break self.phrase(fallback);
                }
            };

            if attempt < MAX_ATTEMPTS {
                tracing::warn!(attempt, %failure, "activity request failed, retrying");
                self.retry_count = attempt;
                notices.push(Notice::trying_again());
                attempt += 1;
                continue;
            }

            tracing::warn!(attempt, %failure, "activity request failed again, using a canned activity");
            notices.push(Notice::using_fallback());
            let fallback = CONTROLLER_FALLBACKS.pick(&mut self.picker);
            break self.phrase(fallback);
        };

        self.current = Some(activity);
        self.retry_count = 0;
        self.busy = false;
        notices
    }

    fn phrase(&self, activity: Activity) -> Activity {
        match self.mode {
            GameMode::Multiplayer if self.players.get() > 1 => activity.for_group(self.players.get()),
            _ => activity,
        }
    }

    /// Copy the share text of the current activity. Does nothing when no
    /// activity is shown yet.
    pub fn copy_current_to_clipboard(
        &mut self,
        clipboard: &mut dyn ClipboardSink,
        now: Instant,
    ) -> Option<Notice> {
        let text = self.current.as_ref()?.share_text();

        match clipboard.write_text(&text) {
            Ok(()) => {
                self.copied_until = Some(now + self.confirmation_window);
                Some(Notice::copied())
            }
            Err(err) => {
                tracing::warn!("copy to clipboard failed: {err}");
                self.copied_until = None;
                Some(Notice::copy_failed())
            }
        }
    }

    pub fn is_copied(&self) -> bool {
        self.copied_until.is_some()
    }

    pub fn confirmation_deadline(&self) -> Option<Instant> {
        self.copied_until
    }

    /// Clears the confirmation once its window has elapsed. Returns whether
    /// anything changed.
    pub fn expire_confirmation(&mut self, now: Instant) -> bool {
        match self.copied_until {
            Some(deadline) if now >= deadline => {
                self.copied_until = None;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn with_confirmation_window(mut self, window: Duration) -> Self {
        self.confirmation_window = window;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::engine::activity_source::ActivityOrigin;
    use crate::engine::clipboard::ClipboardError;
    use crate::model::notice::NoticeVariant;

    enum Step {
        Deliver(Activity),
        Fail,
        Break,
    }

    struct ScriptedProvider {
        steps: VecDeque<Step>,
        calls: usize,
    }

    impl ScriptedProvider {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: steps.into(),
                calls: 0,
            }
        }
    }

    impl ActivityProvider for ScriptedProvider {
        fn fetch(&mut self) -> anyhow::Result<SourceReply> {
            self.calls += 1;
            match self.steps.pop_front() {
                Some(Step::Deliver(activity)) => Ok(SourceReply::Delivered(SourcedActivity {
                    activity,
                    origin: ActivityOrigin::Generated,
                    error: None,
                })),
                Some(Step::Fail) | None => Ok(SourceReply::LogicalFailure {
                    reason: "scripted failure".into(),
                }),
                Some(Step::Break) => Err(anyhow::anyhow!("scripted breakage")),
            }
        }
    }

    #[derive(Default)]
    struct FakeClipboard {
        written: Vec<String>,
        broken: bool,
    }

    impl ClipboardSink for FakeClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.broken {
                return Err(ClipboardError::Unavailable("no display".into()));
            }
            self.written.push(text.to_string());
            Ok(())
        }
    }

    fn first(_: usize) -> usize {
        0
    }

    fn walk() -> Activity {
        Activity::new("Alien Walk", "Walk your street as if you just landed from another planet.")
    }

    #[test]
    fn success_sets_current_and_clears_flags() {
        let mut controller =
            InteractionController::new(ScriptedProvider::new(vec![Step::Deliver(walk())]), first);

        let notices = controller.request_new_activity();

        assert!(notices.is_empty());
        assert_eq!(controller.current(), Some(&walk()));
        assert!(!controller.is_busy());
        assert_eq!(controller.retry_count(), 0);
    }

    #[test]
    fn multiplayer_prefixes_a_copy() {
        let mut controller =
            InteractionController::new(ScriptedProvider::new(vec![Step::Deliver(walk())]), first);
        controller.set_mode(GameMode::Multiplayer);
        controller.set_player_count(4);

        controller.request_new_activity();

        assert_eq!(
            controller.current().unwrap().description,
            "With 4 people: Walk your street as if you just landed from another planet."
        );
    }

    #[test]
    fn multiplayer_leaves_group_descriptions_alone() {
        let activity = Activity::new("Picnic", "Invite friends to an impromptu picnic.");
        let mut controller = InteractionController::new(
            ScriptedProvider::new(vec![Step::Deliver(activity.clone())]),
            first,
        );
        controller.set_mode(GameMode::Multiplayer);
        controller.set_player_count(4);

        controller.request_new_activity();

        assert_eq!(controller.current(), Some(&activity));
    }

    #[test]
    fn solo_mode_never_prefixes() {
        let mut controller =
            InteractionController::new(ScriptedProvider::new(vec![Step::Deliver(walk())]), first);
        controller.set_player_count(6);

        controller.request_new_activity();

        assert_eq!(controller.current(), Some(&walk()));
    }

    #[test]
    fn one_failure_then_success_retries_once() {
        let mut controller = InteractionController::new(
            ScriptedProvider::new(vec![Step::Fail, Step::Deliver(walk())]),
            first,
        );

        let notices = controller.request_new_activity();

        assert_eq!(controller.provider.calls, 2);
        assert_eq!(notices, vec![Notice::trying_again()]);
        assert_eq!(controller.current(), Some(&walk()));
        assert_eq!(controller.retry_count(), 0);
    }

    #[test]
    fn two_failures_fall_back_without_a_third_attempt() {
        let mut controller = InteractionController::new(
            ScriptedProvider::new(vec![Step::Fail, Step::Fail, Step::Deliver(walk())]),
            first,
        );

        let notices = controller.request_new_activity();

        assert_eq!(controller.provider.calls, 2);
        assert_eq!(notices, vec![Notice::trying_again(), Notice::using_fallback()]);
        assert_eq!(notices[1].variant, NoticeVariant::Destructive);
        assert_eq!(controller.current().unwrap().title, "High Five a Stranger");
        assert_eq!(controller.retry_count(), 0);
        assert!(!controller.is_busy());
    }

    #[test]
    fn retry_budget_is_per_request() {
        let mut controller = InteractionController::new(
            ScriptedProvider::new(vec![Step::Fail, Step::Fail, Step::Fail, Step::Deliver(walk())]),
            first,
        );

        controller.request_new_activity();
        let notices = controller.request_new_activity();

        assert_eq!(controller.provider.calls, 4);
        assert_eq!(notices, vec![Notice::trying_again()]);
        assert_eq!(controller.current(), Some(&walk()));
    }

    #[test]
    fn unexpected_error_falls_back_with_notice() {
        let mut controller = InteractionController::new(
            ScriptedProvider::new(vec![Step::Break]),
            |len: usize| len - 1,
        );
        controller.set_mode(GameMode::Multiplayer);
        controller.set_player_count(3);

        let notices = controller.request_new_activity();

        assert_eq!(controller.provider.calls, 1);
        assert_eq!(notices, vec![Notice::something_went_wrong()]);
        let current = controller.current().unwrap();
        assert_eq!(current.title, "Reverse Shopping");
        assert!(current.description.starts_with("With 3 people: "));
        assert_eq!(controller.retry_count(), 0);
        assert!(!controller.is_busy());
    }

    #[test]
    fn empty_delivery_counts_as_failure() {
        let mut controller = InteractionController::new(
            ScriptedProvider::new(vec![Step::Deliver(Activity::new("", "")), Step::Deliver(walk())]),
            first,
        );

        let notices = controller.request_new_activity();

        assert_eq!(notices, vec![Notice::trying_again()]);
        assert_eq!(controller.current(), Some(&walk()));
    }

    #[test]
    fn busy_controller_ignores_reentrant_request() {
        let mut controller =
            InteractionController::new(ScriptedProvider::new(vec![Step::Deliver(walk())]), first);
        controller.busy = true;

        assert!(controller.request_new_activity().is_empty());
        assert_eq!(controller.provider.calls, 0);
        assert_eq!(controller.current(), None);
    }

    #[test]
    fn stepper_is_clamped() {
        let mut controller = InteractionController::new(ScriptedProvider::new(vec![]), first);
        for _ in 0..20 {
            controller.increment_players();
        }
        assert_eq!(controller.snapshot().players.get(), 10);
        for _ in 0..20 {
            controller.decrement_players();
        }
        assert_eq!(controller.snapshot().players.get(), 2);
        controller.set_player_count(42);
        assert_eq!(controller.snapshot().players.get(), 10);
    }

    #[test]
    fn copy_confirmation_expires_after_window() {
        let mut controller =
            InteractionController::new(ScriptedProvider::new(vec![Step::Deliver(walk())]), first);
        controller.request_new_activity();
        let mut clipboard = FakeClipboard::default();
        let t0 = Instant::now();

        let notice = controller.copy_current_to_clipboard(&mut clipboard, t0);

        assert_eq!(notice, Some(Notice::copied()));
        assert_eq!(clipboard.written, vec![walk().share_text()]);
        assert!(controller.is_copied());
        assert_eq!(controller.confirmation_deadline(), Some(t0 + CONFIRMATION_WINDOW));

        assert!(!controller.expire_confirmation(t0 + Duration::from_millis(1999)));
        assert!(controller.is_copied());

        assert!(controller.expire_confirmation(t0 + Duration::from_secs(2)));
        assert!(!controller.is_copied());
        assert!(!controller.expire_confirmation(t0 + Duration::from_secs(3)));
    }

    #[test]
    fn newer_copy_supersedes_deadline() {
        let mut controller =
            InteractionController::new(ScriptedProvider::new(vec![Step::Deliver(walk())]), first);
        controller.request_new_activity();
        let mut clipboard = FakeClipboard::default();
        let t0 = Instant::now();

        controller.copy_current_to_clipboard(&mut clipboard, t0);
        controller.copy_current_to_clipboard(&mut clipboard, t0 + Duration::from_millis(1500));

        assert!(!controller.expire_confirmation(t0 + Duration::from_millis(2500)));
        assert!(controller.expire_confirmation(t0 + Duration::from_millis(3500)));
    }

    #[test]
    fn failed_copy_never_confirms() {
        let mut controller =
            InteractionController::new(ScriptedProvider::new(vec![Step::Deliver(walk())]), first);
        controller.request_new_activity();
        let mut clipboard = FakeClipboard {
            broken: true,
            ..Default::default()
        };

        let notice = controller.copy_current_to_clipboard(&mut clipboard, Instant::now());

        assert_eq!(notice, Some(Notice::copy_failed()));
        assert!(!controller.is_copied());
        assert_eq!(controller.confirmation_deadline(), None);
    }

    #[test]
    fn copy_without_activity_is_a_no_op() {
        let mut controller = InteractionController::new(ScriptedProvider::new(vec![]), first);
        let mut clipboard = FakeClipboard::default();

        assert_eq!(controller.copy_current_to_clipboard(&mut clipboard, Instant::now()), None);
        assert!(clipboard.written.is_empty());
    }

    #[test]
    fn custom_window_is_honoured() {
        let mut controller =
            InteractionController::new(ScriptedProvider::new(vec![Step::Deliver(walk())]), first)
                .with_confirmation_window(Duration::from_millis(10));
        controller.request_new_activity();
        let t0 = Instant::now();

        controller.copy_current_to_clipboard(&mut FakeClipboard::default(), t0);

        assert_eq!(controller.confirmation_deadline(), Some(t0 + Duration::from_millis(10)));
    }
}
