use std::io;
use std::path::Path;

const TARGETS: [&str; 2] = ["heatbucket", "heatbucket_data"];

/// Routes this workspace's log records to stderr, and to `file` when given.
///
/// `level` is any `log::LevelFilter` name, e.g. `"debug"` or `"warn"`.
pub fn setup(level: &str, file: Option<&Path>) -> Result<(), Error> {
    let level_filter = level.parse::<log::LevelFilter>()?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} [{}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ));
        })
        .level(log::LevelFilter::Off);

    for target in TARGETS {
        dispatch = dispatch.level_for(target, level_filter);
    }

    dispatch = dispatch.chain(io::stderr());

    if let Some(path) = file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    SetLog(#[from] log::SetLoggerError),
    #[error(transparent)]
    ParseLevel(#[from] log::ParseLevelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_level() {
        assert!(matches!(setup("chatty", None), Err(Error::ParseLevel(_))));
    }
}
