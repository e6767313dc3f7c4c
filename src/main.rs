use cosmic::app::Settings;
use cosmic::cosmic_config::CosmicConfigEntry;
use cosmic::iced::Limits;

mod application;
mod components;
mod localize;
mod message;
mod pages;

use glean::{ai, clipboard, config, core, notify};

use application::{Flags, Glean};
use config::{CONFIG_VERSION, GleanConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cosmic_cfg = cosmic::cosmic_config::Config::new("dev.glean.app", CONFIG_VERSION)?;
    let config = GleanConfig::get_entry(&cosmic_cfg).unwrap_or_else(|(errs, cfg)| {
        for e in errs {
            eprintln!("glean: config entry: {:?}", e);
        }
        cfg
    });

    // Log to the systemd user journal (`journalctl --user -t glean -f`).
    // Our own targets at info/debug (per config), everything else at warn.
    {
        struct FilteredJournal {
            inner: systemd_journal_logger::JournalLog,
        }

        impl log::Log for FilteredJournal {
            fn enabled(&self, metadata: &log::Metadata) -> bool {
                let target = metadata.target();
                if target.starts_with("glean")
                    || target.starts_with("application")
                    || target.starts_with("pages")
                    || target.starts_with("components")
                {
                    let max = if glean::debug_logging() {
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

        glean::set_debug_logging(config.debug_logging);

        match systemd_journal_logger::JournalLog::new() {
            Ok(journal) => {
                let journal = journal.with_syslog_identifier("glean".to_string());
                log::set_boxed_logger(Box::new(FilteredJournal { inner: journal }))?;
                // Global max stays at Debug so the runtime toggle takes effect.
                log::set_max_level(log::LevelFilter::Debug);
            }
            Err(e) => eprintln!("glean: journal unavailable, logging disabled: {}", e),
        }
    }

    localize::localize();

    log::info!(
        "Starting with task file {} and model {}",
        config.data_file.display(),
        config.model
    );

    let settings = Settings::default().size_limits(Limits::NONE.min_width(480.0).min_height(360.0));

    let flags = Flags { config, cosmic_config: cosmic_cfg };
    cosmic::app::run::<Glean>(settings, flags)?;

    Ok(())
}
