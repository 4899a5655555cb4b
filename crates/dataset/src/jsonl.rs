use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{DatasetError, Result};
use crate::message::{TextRecord, TrainingExample};

/// Read every non-blank line of `path` as a `T`.
pub fn read_jsonl<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DatasetError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut items = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| DatasetError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        items.push(item);
    }

    Ok(items)
}

/// Write one compact JSON object per line.
pub fn write_jsonl<T: Serialize>(path: impl AsRef<Path>, records: &[T]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| DatasetError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n").map_err(|e| DatasetError::io(path, e))?;
    }
    writer.flush().map_err(|e| DatasetError::io(path, e))?;

    Ok(())
}

pub fn read_examples(path: impl AsRef<Path>) -> Result<Vec<TrainingExample>> {
    read_jsonl(path)
}

pub fn write_records(path: impl AsRef<Path>, records: &[TextRecord]) -> Result<()> {
    write_jsonl(path, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use std::fs;

    #[test]
    fn skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.jsonl");
        fs::write(
            &path,
            "{\"messages\":[{\"role\":\"user\",\"content\":\"hi\"}]}\n\n   \n{\"messages\":[]}\n",
        )
        .unwrap();

        let examples = read_examples(&path).unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].messages, vec![Message::user("hi")]);
    }

    #[test]
    fn reports_line_number_of_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.jsonl");
        fs::write(&path, "{\"messages\":[]}\n\n{not json}\n").unwrap();

        let err = read_jsonl::<TrainingExample>(&path).unwrap_err();
        match err {
            DatasetError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.jsonl");
        let err = read_jsonl::<TrainingExample>(&path).unwrap_err();
        assert!(err.to_string().contains("nope.jsonl"));
    }

    #[test]
    fn writes_one_record_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.jsonl");
        let records = vec![
            TextRecord { text: "a\nb".to_string() },
            TextRecord { text: "c".to_string() },
        ];
        write_records(&path, &records).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "{\"text\":\"a\\nb\"}\n{\"text\":\"c\"}\n");
        let back: Vec<TextRecord> = read_jsonl(&path).unwrap();
        assert_eq!(back, records);
    }
}
