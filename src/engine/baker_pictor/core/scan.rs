use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};
use unicase::UniCase;
use walkdir::WalkDir;

#[derive(Debug)]
pub enum ScanError
{
    NotADirectory(PathBuf),
    Walk(walkdir::Error),
}
impl Error for ScanError
{
    fn source(&self) -> Option<&(dyn Error + 'static)>
    {
        match self
        {
            ScanError::Walk(err) => Some(err),
            _ => None,
        }
    }
}
impl Display for ScanError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }
}

// Model files directly inside a directory (not recursive), in file name order
pub struct ScanSources
{
    walk_dir: walkdir::IntoIter,
    extensions: Vec<UniCase<String>>,
}
impl ScanSources
{
    pub fn new(dir: impl AsRef<Path>, extensions: Vec<UniCase<String>>) -> Result<Self, ScanError>
    {
        let dir = dir.as_ref();
        if !dir.is_dir()
        {
            return Err(ScanError::NotADirectory(dir.to_path_buf()));
        }

        let walk_dir = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter();
        Ok(Self { walk_dir, extensions })
    }

    fn matches(extensions: &[UniCase<String>], path: &Path) -> bool
    {
        path.extension().is_some_and(|ext| match ext.to_str()
        {
            None => false,
            Some(ext) => extensions.iter().any(|e| UniCase::new(ext) == UniCase::new(e.as_str())),
        })
    }
}
impl Iterator for ScanSources
{
    type Item = Result<PathBuf, ScanError>;

    fn next(&mut self) -> Option<Self::Item>
    {
        for maybe_entry in self.walk_dir.by_ref()
        {
            let entry = match maybe_entry
            {
                Ok(entry) => entry,
                Err(err) => return Some(Err(ScanError::Walk(err))),
            };

            if !entry.file_type().is_file() || !Self::matches(&self.extensions, entry.path())
            {
                continue;
            }
            return Some(Ok(entry.into_path()));
        }
        None
    }
}

// All matching sources, or the first error
pub fn scan_sources(dir: impl AsRef<Path>, extensions: Vec<UniCase<String>>) -> Result<Vec<PathBuf>, ScanError>
{
    ScanSources::new(dir, extensions)?.collect()
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn filters_and_sorts()
    {
        let dir = std::env::temp_dir().join(format!("pictor_scan_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("nested.glb")).unwrap();
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        for name in ["b_tree.glb", "a_rock.GLB", "notes.txt", "c_lamp.gltf", "noext", "sub/deep.glb"]
        {
            std::fs::write(dir.join(name), b"").unwrap();
        }

        let found = scan_sources(&dir, vec![UniCase::new("glb".to_string())]).unwrap();
        let names: Vec<_> = found.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
        assert_eq!(names, ["a_rock.GLB", "b_tree.glb"]);

        let both = scan_sources(&dir, vec![UniCase::new("glb".to_string()), UniCase::new("gltf".to_string())]).unwrap();
        assert_eq!(both.len(), 3);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_dir()
    {
        assert!(matches!(scan_sources("no/such/models", Vec::new()), Err(ScanError::NotADirectory(_))));
    }
}
