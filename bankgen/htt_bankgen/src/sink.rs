//! Destination for accepted patterns.

use htt_ir::GeneratedPattern;

/// Receives every pattern a run accepts, in generation order.
///
/// Bank writers implement this; persisting the patterns happens in
/// `finish`, which the run calls once after end of input.
pub trait PatternSink {
    fn add_pattern(&mut self, pattern: &GeneratedPattern);

    fn finish(&mut self) {}
}

impl PatternSink for Vec<GeneratedPattern> {
    fn add_pattern(&mut self, pattern: &GeneratedPattern) {
        self.push(pattern.clone());
    }
}

impl<S: PatternSink + ?Sized> PatternSink for &mut S {
    fn add_pattern(&mut self, pattern: &GeneratedPattern) {
        (**self).add_pattern(pattern);
    }

    fn finish(&mut self) {
        (**self).finish();
    }
}
