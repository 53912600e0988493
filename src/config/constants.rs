pub const DEFAULT_REPLAY_DELAY_MS: u32 = 50;

/// Upper bound for the replay pause. Global input stalls for its duration,
/// and a hook that blocks past the system hook timeout is silently removed.
pub const MAX_REPLAY_DELAY_MS: u32 = 200;

pub const CORRECTION_KEY: &str = "correction_key";
pub const REPLAY_DELAY: &str = "replay_delay_ms";
pub const CHORD: &str = "chord";
