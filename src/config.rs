use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use anyhow::bail;

const DEFAULT_TICK: Duration = Duration::from_millis(100);

#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    /// Pattern file to seed from. `.rle` files are read as RLE, anything else as plaintext.
    pub pattern: Option<PathBuf>,

    /// Time between generations
    pub tick: Duration,

    /// Start without stepping
    pub paused: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pattern: None,
            tick: DEFAULT_TICK,
            paused: false,
        }
    }
}

impl Config {
    /// Read options from command line arguments, not including the program name.
    ///
    /// ```notrust
    /// sparselife [--tick-ms <N>] [--paused] [PATTERN]
    /// ```
    pub fn from_args<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--tick-ms" => {
                    let Some(ms) = args.next() else {
                        bail!("--tick-ms needs a value")
                    };

                    let ms: u64 = ms
                        .parse()
                        .with_context(|| format!("Invalid --tick-ms \"{ms}\""))?;

                    if ms == 0 {
                        bail!("--tick-ms must be positive")
                    }

                    config.tick = Duration::from_millis(ms);
                }
                "--paused" => config.paused = true,
                flag if flag.starts_with("--") => bail!("Unknown option {flag}"),
                path => {
                    if config.pattern.is_some() {
                        bail!("Only one pattern file can be given")
                    }

                    config.pattern = Some(PathBuf::from(path));
                }
            }
        }

        Ok(config)
    }
}
