use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AnalyzeError;
use crate::xml::tokens_xml;

pub const SOURCE_EXTENSION: &str = "jack";
pub const OUTPUT_EXTENSION: &str = "xml";

/// The set of source files named by a path: the file itself, or every
/// `.jack` file directly inside a directory.
#[derive(Debug)]
pub struct Analyzer {
    inputs: Vec<PathBuf>,
}

impl Analyzer {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, AnalyzeError> {
        let path = path.as_ref();
        let io_err = |source| AnalyzeError::Io {
            path: path.to_path_buf(),
            source,
        };

        let inputs = if path.is_dir() {
            let mut inputs = Vec::new();
            for entry in fs::read_dir(path).map_err(io_err)? {
                let entry_path = entry.map_err(io_err)?.path();
                if entry_path.is_file() && is_source(&entry_path) {
                    inputs.push(entry_path);
                }
            }
            inputs.sort();
            inputs
        } else if path.is_file() && is_source(path) {
            vec![path.to_path_buf()]
        } else {
            return Err(AnalyzeError::InvalidPath(path.to_path_buf()));
        };

        Ok(Self { inputs })
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }
}

fn is_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Serialized forms of one source file.
#[derive(Debug)]
pub struct Compiled {
    pub tree: String,
    pub tokens: Option<String>,
}

pub fn compile_file(path: &Path, with_tokens: bool) -> Result<Compiled, AnalyzeError> {
    let source = fs::read_to_string(path).map_err(|source| AnalyzeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let compile_err = |source| AnalyzeError::Compile {
        path: path.to_path_buf(),
        source,
    };

    let tree = crate::parse(&source).map_err(compile_err)?;
    let tokens = if with_tokens {
        Some(tokens_xml(&source).map_err(|err| compile_err(err.into()))?)
    } else {
        None
    };

    Ok(Compiled { tree, tokens })
}

/// `dir/Main.jack` becomes `dir/Main<suffix>.xml`, or `out_dir/Main<suffix>.xml`.
pub fn output_path(input: &Path, out_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{}{}.{}", stem, suffix, OUTPUT_EXTENSION);
    match out_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Writes the tree (and token listing, if present) and returns the paths written.
pub fn write_outputs(
    input: &Path,
    compiled: &Compiled,
    out_dir: Option<&Path>,
) -> Result<Vec<PathBuf>, AnalyzeError> {
    let mut outputs = vec![(output_path(input, out_dir, ""), &compiled.tree)];
    if let Some(tokens) = &compiled.tokens {
        outputs.push((output_path(input, out_dir, "T"), tokens));
    }

    let mut written = Vec::new();
    for (path, contents) in outputs {
        fs::write(&path, contents).map_err(|source| AnalyzeError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }
    Ok(written)
}
