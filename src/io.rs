use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::warn;
use thiserror::Error;

use crate::types::RawTransaction;

pub const DELIMITER: char = ',';

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One transaction per line; tokens are trimmed, empty fields and blank lines
/// are skipped.
pub fn parse_transactions(text: &str) -> Vec<RawTransaction> {
    text.lines()
        .map(|line| {
            line.split(DELIMITER)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect::<RawTransaction>()
        })
        .filter(|transaction| !transaction.is_empty())
        .collect()
}

pub fn read_transactions<P: AsRef<Path>>(path: P) -> Result<Vec<RawTransaction>, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    Ok(parse_transactions(&text))
}

/// Like `read_transactions`, but an unreadable file is reported as `None`.
pub fn load_transactions<P: AsRef<Path>>(path: P) -> Option<Vec<RawTransaction>> {
    match read_transactions(path) {
        Ok(transactions) => Some(transactions),
        Err(err) => {
            warn!("{}", err);
            None
        }
    }
}
