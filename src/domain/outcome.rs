#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorrectionOutcome {
    /// `count` is the number of consecutive corrections of the same text.
    Applied { count: u32, replayed: usize },
    Skipped(SkipReason),
    Failed(Failure),
}

impl CorrectionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NothingToCorrect,
    Reentry,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::NothingToCorrect => "nothing_to_correct",
            SkipReason::Reentry => "reentry",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Failure {
    InputError,
    LayoutError,
}

impl Failure {
    pub fn as_str(self) -> &'static str {
        match self {
            Failure::InputError => "input_error",
            Failure::LayoutError => "layout_error",
        }
    }
}
