/// What to do when the walk over fields, methods and attributes fails.
///
/// Without that walk a class's own field and method names are unknown, so a
/// literal sharing a slot with one of them could be rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyFallback {
    /// Treat the class as unparseable and leave it untouched.
    #[default]
    SkipClass,
    /// Rewrite with the names found in the constant pool alone.
    PoolOnly,
}

/// Parameters shared by every class rewritten in one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteOptions {
    pub body_fallback: BodyFallback,
}

impl RewriteOptions {
    pub fn pool_only_fallback() -> Self {
        Self {
            body_fallback: BodyFallback::PoolOnly,
        }
    }
}
