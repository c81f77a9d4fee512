use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary corpus checkout directory
pub fn create_test_corpus_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a file under the corpus root, creating parent directories as needed
pub fn create_test_file(corpus_dir: &TempDir, path: &str, content: &str) -> PathBuf {
    let file_path = corpus_dir.path().join(path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}

/// Create an article directory with its title, subtitle and body files
pub fn create_test_article(
    corpus_dir: &TempDir,
    id: &str,
    title: &str,
    subtitle: &str,
    body: &str,
) -> PathBuf {
    create_test_file(corpus_dir, &format!("{id}/title.md"), title);
    create_test_file(corpus_dir, &format!("{id}/sub-title.md"), subtitle);
    create_test_file(corpus_dir, &format!("{id}/01.md"), body)
}
