use std::{
    fs::File,
    io::{self, BufWriter, Read as _, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use blockfall_evaluator::{
    weight_store::{WeightSource, WeightStore},
    weights::Weights,
};
use rand::Rng as _;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Writes `value` as pretty JSON to `output_path`, or to stdout when it is `None`.
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = match output_path {
            Some(path) => Output::open(path)?,
            None => Output::stdout(),
        };
        output.write_json(value)
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads JSON from `path`, or from stdin when `path` is `None`.
pub fn read_json_input<T>(file_kind: &str, path: Option<&Path>) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    if let Some(path) = path {
        return read_json_file(file_kind, path);
    }
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .with_context(|| format!("Failed to read {file_kind} from stdin"))?;
    serde_json::from_str(&input).with_context(|| format!("Failed to parse {file_kind} JSON"))
}

/// Returns the agent weights to play with.
///
/// With `no_load`, the weight file is not touched. Otherwise a missing or broken file falls
/// back to [`Weights::DEFAULT`].
pub fn load_weights(weights_file: &Path, no_load: bool) -> Weights {
    if no_load {
        log::info!("using default weights");
        return Weights::DEFAULT;
    }
    let loaded = WeightStore::new(weights_file).load_or(Weights::DEFAULT);
    match &loaded.source {
        WeightSource::Stored => {
            log::info!("loaded weights from {}", weights_file.display());
        }
        WeightSource::Missing => {
            log::info!(
                "{} not found, using default weights",
                weights_file.display()
            );
        }
        WeightSource::Fallback(_) => {}
    }
    loaded.weights
}

/// Returns `seed`, or a fresh random seed that is logged so the run can be repeated.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let seed = rand::rng().random();
        log::info!("using random seed {seed}");
        seed
    })
}
