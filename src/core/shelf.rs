// Catalog file session: advisory locking, load on open, atomic rewrite on save.
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::core::catalog::Catalog;
use crate::core::error::{Error, ErrorKind};
use crate::core::record::BookRecord;

#[derive(Debug)]
pub struct Shelf {
    path: PathBuf,
    lock_file: File,
    catalog: Catalog,
}

impl Shelf {
    /// Opens a catalog file for this process, taking an exclusive advisory
    /// lock on a `.lock` sibling for the lifetime of the session. A missing
    /// catalog file is an empty catalog; an unreadable or undecodable one
    /// fails the open.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| io_error(err, parent))?;
            }
        }

        let lock_file = acquire_lock(&path)?;

        let catalog = match fs::read_to_string(&path) {
            Ok(text) => Catalog::decode(&text).map_err(|err| err.with_path(&path))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Catalog::new(),
            Err(err) => return Err(io_error(err, &path)),
        };
        debug!(path = %path.display(), records = catalog.len(), "opened shelf");

        Ok(Self {
            path,
            lock_file,
            catalog,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn books(&self) -> &[BookRecord] {
        self.catalog.books()
    }

    pub fn find_book(&self, id: u64) -> Result<&BookRecord, Error> {
        self.catalog.find_book(id)
    }

    /// Adds a record and persists the catalog. When the save fails the
    /// file keeps its previous contents.
    pub fn add_book(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Result<u64, Error> {
        let id = self.catalog.add_book(title, author);
        debug!(id, "added book");
        self.save()?;
        Ok(id)
    }

    pub fn issue_book(&mut self, id: u64, holder: &str) -> Result<&BookRecord, Error> {
        self.catalog.issue_book(id, holder)?;
        debug!(id, holder, "issued book");
        self.save()?;
        self.catalog.find_book(id)
    }

    pub fn return_book(&mut self, id: u64) -> Result<&BookRecord, Error> {
        self.catalog.return_book(id)?;
        debug!(id, "returned book");
        self.save()?;
        self.catalog.find_book(id)
    }

    pub fn delete_book(&mut self, id: u64) -> Result<BookRecord, Error> {
        let record = self.catalog.delete_book(id)?;
        debug!(id, "deleted book");
        self.save()?;
        Ok(record)
    }

    /// Rewrites the whole catalog file: encode to a temporary sibling, sync,
    /// rename over the original. Readers never observe a half-written file.
    fn save(&self) -> Result<(), Error> {
        let tmp = tmp_path(&self.path);
        let text = self.catalog.encode();
        if let Err(err) = write_file(&tmp, &text) {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }
        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error(err, &self.path));
        }
        debug!(path = %self.path.display(), records = self.catalog.len(), "saved shelf");
        Ok(())
    }
}

impl Drop for Shelf {
    fn drop(&mut self) {
        let _ = self.lock_file.unlock();
    }
}

fn acquire_lock(path: &Path) -> Result<File, Error> {
    let lock = lock_path(path);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(&lock)
        .map_err(|err| io_error(err, &lock))?;
    file.try_lock_exclusive().map_err(|err| {
        Error::new(io_error_kind(&err))
            .with_message("catalog is in use by another process")
            .with_path(path)
            .with_source(err)
    })?;
    Ok(file)
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("catalog"));
    name.push(".lock");
    path.with_file_name(name)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("catalog"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_file(path: &Path, text: &str) -> Result<(), Error> {
    let mut file = File::create(path).map_err(|err| io_error(err, path))?;
    file.write_all(text.as_bytes())
        .map_err(|err| io_error(err, path))?;
    file.sync_all().map_err(|err| io_error(err, path))?;
    Ok(())
}

fn io_error(err: io::Error, path: &Path) -> Error {
    Error::new(io_error_kind(&err)).with_path(path).with_source(err)
}

fn io_error_kind(err: &io::Error) -> ErrorKind {
    match err.kind() {
        io::ErrorKind::WouldBlock => ErrorKind::Busy,
        io::ErrorKind::PermissionDenied => ErrorKind::Permission,
        _ => ErrorKind::Io,
    }
}

#[cfg(test)]
mod tests {
    use super::{Shelf, lock_path};
    use crate::core::error::ErrorKind;
    use std::fs;
    use std::io;

    #[test]
    fn would_block_maps_to_busy() {
        let err = io::Error::from(io::ErrorKind::WouldBlock);
        assert_eq!(super::io_error_kind(&err), ErrorKind::Busy);
        let err = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(super::io_error_kind(&err), ErrorKind::Permission);
    }

    #[test]
    fn missing_file_opens_as_empty_catalog() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.shelf");

        let mut shelf = Shelf::open(&path).expect("open");
        assert!(shelf.books().is_empty());

        assert_eq!(shelf.add_book("Dune", "Herbert").expect("add"), 1);
        assert!(path.exists());
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.shelf");

        {
            let mut shelf = Shelf::open(&path).expect("open");
            shelf.add_book("Dune", "Herbert").expect("add");
            shelf.add_book("Foundation", "Asimov").expect("add");
            shelf.issue_book(1, "Alice").expect("issue");
        }

        let mut shelf = Shelf::open(&path).expect("reopen");
        assert_eq!(shelf.books().len(), 2);
        let first = shelf.find_book(1).expect("find");
        assert!(first.issued);
        assert_eq!(first.issued_to, "Alice");
        assert_eq!(shelf.add_book("Hyperion", "Simmons").expect("add"), 3);
    }

    #[test]
    fn undecodable_file_fails_the_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.shelf");
        fs::write(&path, "not a record\n").expect("write");

        let err = Shelf::open(&path).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::Corrupt);
        assert_eq!(err.path(), Some(path.as_path()));
    }

    #[test]
    fn second_session_on_the_same_file_is_busy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.shelf");

        let _held = Shelf::open(&path).expect("open");
        let err = Shelf::open(&path).expect_err("should be locked");
        assert_eq!(err.kind(), ErrorKind::Busy);
    }

    #[test]
    fn lock_file_is_a_dot_lock_sibling() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.shelf");
        assert_eq!(lock_path(&path), dir.path().join("catalog.shelf.lock"));

        let _shelf = Shelf::open(&path).expect("open");
        assert!(dir.path().join("catalog.shelf.lock").exists());
    }
}
