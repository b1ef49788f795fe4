use crate::index::FieldIndex;
use crate::store::{Document, DocumentStore};
use crate::{DocId, Field, InvertedIndex, SearchIndex, TermId};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 2;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: usize,
    pub created_at: String,
    pub version: u32,
    pub analyzer: String,
    pub fields: Vec<Field>,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn dictionary(&self) -> PathBuf { self.root.join("dictionary.bin") }
    fn docs(&self) -> PathBuf { self.root.join("docs.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    fn postings_dir(&self) -> PathBuf { self.root.join("postings") }
    fn postings(&self, field: Field) -> PathBuf { self.postings_dir().join(format!("{field}.postings.bin")) }
    fn doc_id_map(&self) -> PathBuf { self.root.join("doc_id_map.bin") }

    /// A complete index lives here. `meta.json` is written last, so a build
    /// interrupted midway does not count.
    pub fn exists(&self) -> bool { self.meta().is_file() }
}

fn write_bin<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut f = BufWriter::new(File::create(path).with_context(|| format!("create {}", path.display()))?);
    bincode::serialize_into(&mut f, value)?;
    f.flush()?;
    Ok(())
}

fn read_bin<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let value = bincode::deserialize_from(BufReader::new(f))?;
    Ok(value)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root).with_context(|| format!("create {}", paths.root.display()))?;
    let path = paths.meta();
    let mut f = BufWriter::new(File::create(&path).with_context(|| format!("create {}", path.display()))?);
    serde_json::to_writer_pretty(&mut f, meta)?;
    f.flush()?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let path = paths.meta();
    let f = File::open(&path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parse {}", path.display()))
}

/// Persist a sealed index under `paths.root`.
pub fn save_index(paths: &IndexPaths, index: &SearchIndex) -> Result<()> {
    create_dir_all(paths.postings_dir())?;
    let inverted = &index.index;
    write_bin(&paths.dictionary(), &inverted.dictionary)?;
    for (field, field_index) in &inverted.fields {
        write_bin(&paths.postings(*field), field_index)?;
    }
    write_bin(&paths.docs(), &index.store.docs)?;
    write_bin(&paths.doc_id_map(), &index.store.by_location)?;

    let meta = MetaFile {
        num_docs: inverted.num_docs,
        num_terms: inverted.num_terms(),
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
        version: FORMAT_VERSION,
        analyzer: index.analyzer.clone(),
        fields: inverted.fields.keys().copied().collect(),
    };
    save_meta(paths, &meta)?;
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, "index saved");
    Ok(())
}

/// Load a complete index for querying.
pub fn load_index(paths: &IndexPaths) -> Result<SearchIndex> {
    let meta = load_meta(paths).with_context(|| format!("no index at {}", paths.root.display()))?;
    anyhow::ensure!(
        meta.version == FORMAT_VERSION,
        "index format version {} is not supported (expected {FORMAT_VERSION})",
        meta.version
    );

    let dictionary: HashMap<String, TermId> = read_bin(&paths.dictionary())?;
    let mut fields: BTreeMap<Field, FieldIndex> = BTreeMap::new();
    for field in &meta.fields {
        fields.insert(*field, read_bin(&paths.postings(*field))?);
    }
    let docs: Vec<Document> = read_bin(&paths.docs())?;
    let by_location: HashMap<String, DocId> = read_bin(&paths.doc_id_map())?;
    anyhow::ensure!(docs.len() == meta.num_docs as usize, "docs.bin holds {} documents, meta.json says {}", docs.len(), meta.num_docs);

    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, "index loaded");
    Ok(SearchIndex {
        analyzer: meta.analyzer,
        store: DocumentStore::from_parts(docs, by_location),
        index: InvertedIndex { dictionary, fields, num_docs: meta.num_docs },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewDocument;
    use crate::tokenizer::EnglishNormalizer;
    use crate::IndexWriter;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn saved_index_loads_back() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path().join("idx"));
        assert!(!paths.exists());

        let mut writer = IndexWriter::new(Arc::new(EnglishNormalizer));
        writer
            .add(NewDocument { location: "a.html", title: "Rust", body: "rust is fast", date: Some("2020-01-01"), ..Default::default() })
            .unwrap();
        writer.add(NewDocument { location: "b.html", title: "Go", body: "go is simple", ..Default::default() }).unwrap();
        save_index(&paths, &writer.finish()).unwrap();
        assert!(paths.exists());

        let loaded = load_index(&paths).unwrap();
        assert_eq!(loaded.num_docs(), 2);
        assert_eq!(loaded.analyzer(), "english-snowball-v1");
        assert_eq!(loaded.store().lookup("b.html"), Some(1));
        assert_eq!(loaded.document(0).unwrap().date, "2020-01-01");
        assert_eq!(loaded.inverted().document_frequency("rust", Field::Body), 1);
        assert_eq!(loaded.inverted().average_field_length(Field::Body), 2.0);
        assert!(loaded.inverted().has_field(Field::Date));
    }

    #[test]
    fn meta_file_round_trips_and_names_bad_paths() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path());
        let meta = MetaFile {
            num_docs: 3,
            num_terms: 7,
            created_at: "2024-01-01T00:00:00Z".into(),
            version: FORMAT_VERSION,
            analyzer: "english-snowball-v1".into(),
            fields: vec![Field::Title, Field::Body],
        };
        save_meta(&paths, &meta).unwrap();
        let loaded = load_meta(&paths).unwrap();
        assert_eq!((loaded.num_docs, loaded.num_terms, loaded.fields), (3, 7, vec![Field::Title, Field::Body]));

        std::fs::write(dir.path().join("meta.json"), "{ not json").unwrap();
        let err = load_meta(&paths).unwrap_err();
        assert!(format!("{err:#}").contains("meta.json"), "{err:#}");
    }

    #[test]
    fn missing_index_fails_to_load() {
        let dir = tempdir().unwrap();
        assert!(load_index(&IndexPaths::new(dir.path())).is_err());
    }
}
