#[derive(Debug)]
pub struct ProcessingEvent {
    pub stage: Stage,
    pub progress: StageProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    OpeningJar,
    RewritingClasses,
    Committing,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::OpeningJar => "Opening JAR",
            Stage::RewritingClasses => "Rewriting Classes",
            Stage::Committing => "Committing",
        }
    }
}

impl From<Stage> for ProcessingEvent {
    fn from(value: Stage) -> Self {
        ProcessingEvent {
            stage: value,
            progress: StageProgress::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageProgress {
    Unknown,
    Percentage(f32),
    Done,
}
