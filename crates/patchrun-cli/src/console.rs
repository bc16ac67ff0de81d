use std::sync::Mutex;
use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};
use patchrun_engine::ProgressReporter;

pub struct ConsoleReporter {
    plain: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new(plain: bool) -> Self {
        Self {
            plain,
            bar: Mutex::new(None),
        }
    }

    fn update(&self, percentage: f32, message: &str) {
        if self.plain {
            println!("[{percentage:>5.1}%] {message}");
            return;
        }
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                bar.set_position(percentage.round() as u64);
                bar.set_message(message.to_string());
            }
        }
    }

    fn print_error(&self, error: &anyhow::Error) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                bar.suspend(|| eprintln!("{}", colorize(error_style(), &format!("{error:#}"))));
                return;
            }
        }
        eprintln!("{}", colorize(error_style(), &format!("{error:#}")));
    }
}

impl ProgressReporter for ConsoleReporter {
    fn initialize(&self) -> anyhow::Result<()> {
        if self.plain {
            return Ok(());
        }
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.cyan.bold} {msg:<40} [{bar:20.cyan/blue}] {pos:>3}%",
        ) {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
        Ok(())
    }

    fn initializing_fail(&self, error: &anyhow::Error) {
        self.print_error(error);
    }

    fn report_unpacking_progress(&self, percentage: f32, file_name: &str) {
        self.update(percentage, &format!("Copying {file_name}..."));
    }

    fn report_operation_progress(&self, percentage: f32, message: &str) {
        self.update(percentage, message);
    }

    fn fail(&self, error: &anyhow::Error) -> bool {
        self.print_error(error);
        true
    }

    fn terminate(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }
}

fn error_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightRed.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
