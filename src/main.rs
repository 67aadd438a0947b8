use std::io::Read;

use murmur::app::{App, AppEvent};
use murmur::classify::openai::OpenAiClassifier;
use murmur::config::AppConfig;
use murmur::core::task::TimingFilter;
use murmur::session::{CaptureSession, CaptureSupport, ManualSession};
use murmur::storage::Storage;

fn main() {
    let config = AppConfig::load(&AppConfig::config_path());

    // Set up logging to the systemd user journal (`journalctl --user -t murmur -f`).
    // Wrapper filters: murmur crate at info/debug (per config), everything else at warn.
    {
        struct FilteredJournal {
            inner: systemd_journal_logger::JournalLog,
        }

        impl log::Log for FilteredJournal {
            fn enabled(&self, metadata: &log::Metadata) -> bool {
                if metadata.target().starts_with("murmur") {
                    let max = if murmur::debug_logging() {
                        log::LevelFilter::Debug
                    } else {
                        log::LevelFilter::Info
                    };
                    metadata.level() <= max
                } else {
                    metadata.level() <= log::LevelFilter::Warn
                }
            }
            fn log(&self, record: &log::Record) {
                if self.enabled(record.metadata()) {
                    self.inner.log(record);
                }
            }
            fn flush(&self) {
                self.inner.flush();
            }
        }

        if let Ok(journal) = systemd_journal_logger::JournalLog::new() {
            let journal = journal.with_syslog_identifier("murmur".to_string());
            murmur::set_debug_logging(config.debug_logging);
            if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
                // Global max must be Debug so debug logs can pass when toggled
                log::set_max_level(log::LevelFilter::Debug);
            }
        }
    }

    run(config);
}

#[tokio::main]
async fn run(config: AppConfig) {
    let storage = Storage::new(config.data_dir.clone());
    let mut app = App::load(&config, storage);

    let (filter, transcript_arg) = parse_args();
    if let Some(filter) = filter {
        app.set_filter(filter);
    }

    // No speech backend in a terminal front end; manual entry is the
    // degraded path the capture contract requires.
    let support = CaptureSupport::Unsupported;
    let transcript = match transcript_arg {
        Some(text) => text,
        None => {
            if support == CaptureSupport::Unsupported {
                eprintln!("Speech capture unavailable here. Type your note, then Ctrl-D:");
            }
            capture_manual()
        }
    };

    if transcript.trim().is_empty() {
        println!("Nothing captured.");
        return;
    }

    let classifier = OpenAiClassifier::new(&config, app.credential().map(str::to_string));
    let events = app.run_extraction(&classifier, &transcript).await;
    for event in &events {
        if let AppEvent::Notice(text) = event {
            println!("{}", text);
        }
    }

    render(&app);
}

/// One manual-entry capture session over stdin.
fn capture_manual() -> String {
    let mut session = ManualSession::default();
    session.start();
    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_ok() {
        session.push(&input);
    }
    session.stop()
}

/// `murmur [--filter all|today|week|later] [transcript words...]`
fn parse_args() -> (Option<TimingFilter>, Option<String>) {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut filter = None;
    let mut words = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--filter" {
            filter = iter.next().as_deref().and_then(TimingFilter::from_keyword);
        } else {
            words.push(arg);
        }
    }

    let transcript = if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    };
    (filter, transcript)
}

fn render(app: &App) {
    if app.tasks.is_empty() {
        println!("All done.");
        return;
    }
    for (category, tasks) in app.grouped() {
        println!("\n{} ({})", category.name, tasks.len());
        for task in tasks {
            println!("  [{}] {}", task.timing.as_keyword(), task.text);
        }
    }
}
