//! Terminal implementations of the progress surface and notifier.

use std::collections::HashMap;

use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use installkit::host::{FullInstallItem, Notifier, ProgressItem, ProgressSurface};
use parking_lot::Mutex;

const ITEM_TEMPLATE: &str = "{prefix:.bold} [{bar:40.cyan/blue}] {pos:>3}%  {msg}";
const FULL_INSTALL_TEMPLATE: &str = "{prefix:.bold.green} [{bar:40.green/blue}] {pos:>3}%  {msg}";

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░")
}

/// Renders progress items as indicatif bars, one per item id.
pub struct ConsoleSurface {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
    full_install: Mutex<Option<ProgressBar>>,
}

impl ConsoleSurface {
    pub fn new(multi: MultiProgress) -> Self {
        Self {
            multi,
            bars: Mutex::new(HashMap::new()),
            full_install: Mutex::new(None),
        }
    }

    fn new_bar(&self, template: &str) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new(100));
        bar.set_style(bar_style(template));
        bar
    }
}

impl ProgressSurface for ConsoleSurface {
    fn add_progress_item(&self, item: &ProgressItem) {
        let mut bars = self.bars.lock();
        let bar = bars
            .entry(item.id.clone())
            .or_insert_with(|| self.new_bar(ITEM_TEMPLATE));
        bar.set_prefix(item.title.clone());
        bar.set_position(u64::from(item.percent));
        bar.set_message(item.message.clone());
    }

    fn stop_progress_item(&self, id: &str) {
        if let Some(bar) = self.bars.lock().remove(id) {
            bar.finish();
        }
    }

    fn full_install_progress_item(&self, item: Option<&FullInstallItem>) {
        let mut slot = self.full_install.lock();
        match item {
            Some(item) => {
                let bar = slot.get_or_insert_with(|| self.new_bar(FULL_INSTALL_TEMPLATE));
                bar.set_prefix(item.title.clone());
                bar.set_position(u64::from(item.percent));
                bar.set_message(format!("{}  {}", item.subtitle, item.detail));
            }
            None => {
                if let Some(bar) = slot.take() {
                    bar.finish_and_clear();
                }
            }
        }
    }
}

/// Prints dialogs to the terminal without tearing the progress bars.
pub struct ConsoleNotifier {
    multi: MultiProgress,
}

impl ConsoleNotifier {
    pub fn new(multi: MultiProgress) -> Self {
        Self { multi }
    }
}

impl Notifier for ConsoleNotifier {
    fn show_installed(&self, name: &str) {
        self.multi.suspend(|| {
            println!("{} {} was installed", style("✓").green().bold(), name);
        });
    }

    fn show_failed_install(&self, name: &str, reason: &str) {
        self.multi.suspend(|| {
            eprintln!(
                "{} {} could not be installed: {}",
                style("✗").red().bold(),
                style(name).bold(),
                reason
            );
        });
    }

    fn send_notification(&self, title: &str, body: &str) {
        self.multi.suspend(|| {
            println!("{} {}", style(title).cyan().bold(), body);
        });
    }
}
