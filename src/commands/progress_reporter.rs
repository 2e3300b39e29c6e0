use crate::documents::Progress;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const DETERMINATE_TEMPLATE: &str = "{prefix:>12.bold.cyan} [{bar:25}] {pos}/{len} {msg}";
const DETERMINATE_TEMPLATE_NO_COLOR: &str = "{prefix:>12} [{bar:25}] {pos}/{len} {msg}";
const INDETERMINATE_TEMPLATE: &str = "{prefix:>12.bold.cyan} {spinner} {msg}";
const INDETERMINATE_TEMPLATE_NO_COLOR: &str = "{prefix:>12} {spinner} {msg}";

/// A terminal progress bar for the document fetch loop.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
    use_colors: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter drawing to stderr.
    ///
    /// When `visible` is false nothing is drawn, which keeps log output readable.
    #[must_use]
    pub fn new(visible: bool, use_colors: bool) -> Self {
        let bar = ProgressBar::hidden();
        if visible {
            bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        }

        let reporter = Self { bar, use_colors };
        reporter.bar.set_style(reporter.style(INDETERMINATE_TEMPLATE, INDETERMINATE_TEMPLATE_NO_COLOR));
        reporter
    }

    fn style(&self, colored: &str, plain: &str) -> ProgressStyle {
        let template = if self.use_colors { colored } else { plain };
        ProgressStyle::with_template(template)
            .map(|style| style.progress_chars("=> "))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}

impl Progress for ProgressReporter {
    fn set_phase(&self, phase: &str) {
        self.bar.set_prefix(phase.to_string());
        self.bar.tick();
    }

    fn set_total(&self, total: u64) {
        self.bar.set_style(self.style(DETERMINATE_TEMPLATE, DETERMINATE_TEMPLATE_NO_COLOR));
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn advance(&self, message: &str) {
        self.bar.set_message(message.to_string());
        self.bar.inc(1);
    }

    fn done(&self) {
        self.bar.finish_and_clear();
    }
}
