// (c) Roel Kluin, 2023, GPL v3

use crate::sequence::{Sequence, SequenceIds};
use anyhow::{bail, Context, Result};
use flate2::read::MultiGzDecoder;
use log::{info, warn};
use noodles_fasta as fasta;
use noodles_fastq as fastq;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;

/// open `path`, decompressing when it ends in `.gz`.
pub fn open(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let inner: Box<dyn Read> = match path.extension() {
        Some(ext) if ext == "gz" => Box::new(MultiGzDecoder::new(file)),
        _ => Box::new(file),
    };
    Ok(Box::new(BufReader::new(inner)))
}

/// Read all FASTA or FASTQ records, told apart by the first character. Identities
/// are taken from `ids` in file order.
pub fn read_sequences<R: BufRead>(mut reader: R, ids: &mut SequenceIds) -> Result<Vec<Arc<Sequence>>> {
    let first = reader.fill_buf()?.first().copied();
    let sequences = match first {
        None => Vec::new(),
        Some(b'>') => read_fasta(fasta::Reader::new(reader), ids)?,
        Some(b'@') => read_fastq(fastq::Reader::new(reader), ids)?,
        Some(c) => bail!("neither FASTA nor FASTQ: starts with {:?}", char::from(c)),
    };
    Ok(sequences)
}

fn read_fasta<R: BufRead>(mut reader: fasta::Reader<R>, ids: &mut SequenceIds) -> Result<Vec<Arc<Sequence>>> {
    let mut sequences = Vec::new();
    for res in reader.records() {
        let record = res.context("reading FASTA record")?;
        let data: &[u8] = record.sequence().as_ref();
        sequences.push(Arc::new(ids.create(record.name(), data)));
    }
    Ok(sequences)
}

fn read_fastq<R: BufRead>(mut reader: fastq::Reader<R>, ids: &mut SequenceIds) -> Result<Vec<Arc<Sequence>>> {
    let mut sequences = Vec::new();
    for res in reader.records() {
        let record = res.context("reading FASTQ record")?;
        let name = String::from_utf8_lossy(record.name());
        sequences.push(Arc::new(ids.create_with_quality(
            name,
            record.sequence(),
            record.quality_scores(),
        )));
    }
    Ok(sequences)
}

/// [`read_sequences`] from a file.
pub fn load(path: &Path, ids: &mut SequenceIds) -> Result<Vec<Arc<Sequence>>> {
    let sequences = read_sequences(open(path)?, ids).with_context(|| format!("loading {}", path.display()))?;
    if sequences.is_empty() {
        warn!("{} holds no sequences", path.display());
    } else {
        let bases: usize = sequences.iter().map(|s| s.len()).sum();
        info!("{}: {} sequences, {bases} bases", path.display(), sequences.len());
    }
    Ok(sequences)
}
