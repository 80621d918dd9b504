use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
};

/// Where a command stream is read from or written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamTarget {
    /// stdin or stdout; selected by omitting the path, or by "-".
    Standard,

    /// A file on disk.
    File(PathBuf),
}

impl StreamTarget {
    /// Resolve an optional path argument.
    pub fn from_arg(path: Option<&str>) -> Self {
        match path {
            None | Some("-") => Self::Standard,
            Some(p) => Self::File(PathBuf::from(p)),
        }
    }
}

/// Input argument group.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// JSONL generation records; "-" or omitted reads stdin.
    #[clap(long, default_value = None)]
    pub input: Option<String>,
}

impl InputArgs {
    /// Where the input is read from.
    pub fn target(&self) -> StreamTarget {
        StreamTarget::from_arg(self.input.as_deref())
    }

    /// Open a buffered reader for the input.
    pub fn open_reader(&self) -> Result<Box<dyn BufRead>, Box<dyn std::error::Error>> {
        Ok(match self.target() {
            StreamTarget::Standard => Box::new(BufReader::new(std::io::stdin().lock())),
            StreamTarget::File(path) => Box::new(BufReader::new(File::open(path)?)),
        })
    }
}

/// Output argument group.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Output file; "-" or omitted writes stdout.
    #[clap(long, default_value = None)]
    pub output: Option<String>,
}

impl OutputArgs {
    /// Where the output is written to.
    pub fn target(&self) -> StreamTarget {
        StreamTarget::from_arg(self.output.as_deref())
    }

    /// Open a buffered writer for the output.
    pub fn open_writer(&self) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
        Ok(match self.target() {
            StreamTarget::Standard => Box::new(BufWriter::new(std::io::stdout().lock())),
            StreamTarget::File(path) => Box::new(BufWriter::new(File::create(path)?)),
        })
    }
}

/// Read the non-blank lines of a label file, trimmed.
pub fn read_lines(path: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}
