// SPDX-FileCopyrightText: 2025 The Rollcall Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::Result, metadata};

#[async_trait]
pub(crate) trait Storage<T>: Send + Sync {
    async fn get(&mut self) -> Result<Option<T>>;
    async fn update(&mut self, data: &T) -> Result<()>;
    async fn clear(&mut self) -> Result<()>;
}

#[async_trait]
impl<Tn: Sync, T: Storage<Tn> + ?Sized> Storage<Tn> for Box<T> {
    async fn get(&mut self) -> Result<Option<Tn>> {
        (**self).get().await
    }

    async fn update(&mut self, data: &Tn) -> Result<()> {
        (**self).update(data).await
    }

    async fn clear(&mut self) -> Result<()> {
        (**self).clear().await
    }
}

/// Process-lifetime storage only. Selected when the operator declines to keep
/// the token on disk.
pub(crate) struct Memory<T> {
    data: Option<T>,
}

impl<T> Memory<T> {
    pub(crate) const fn new() -> Self {
        Self { data: None }
    }
}

#[async_trait]
impl<T: Send + Sync + Clone> Storage<T> for Memory<T> {
    async fn get(&mut self) -> Result<Option<T>> {
        Ok(self.data.clone())
    }

    async fn update(&mut self, data: &T) -> Result<()> {
        self.data = Some(data.clone());
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        self.data = None;
        Ok(())
    }
}

pub(crate) struct File {
    path: PathBuf,
}

impl File {
    /// Fails with `None` when no home directory can be resolved for the
    /// current platform.
    pub(crate) fn new<P: AsRef<Path>>(file: P) -> Option<Self> {
        metadata::PROJECT_DIRS.as_ref().map(|dirs| Self {
            path: dirs.data_dir().to_owned().join(file),
        })
    }
}

#[async_trait]
impl<T: Send + Serialize + Sync + for<'de> Deserialize<'de>> Storage<T> for File {
    async fn get(&mut self) -> Result<Option<T>> {
        match fs::File::open(&self.path) {
            Ok(fp) => Ok(Some(serde_json::from_reader::<fs::File, T>(fp)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&mut self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(&self.path)?;
        serde_json::to_writer(file, data)?;
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        // Clearing an already-clear store is not an error.
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Result;

    use super::*;

    #[tokio::test]
    async fn memory_round_trip() -> Result<()> {
        let mut storage = Memory::<String>::new();
        assert!(storage.get().await?.is_none());

        storage.update(&"token".to_owned()).await?;
        assert_eq!(storage.get().await?.as_deref(), Some("token"));

        storage.clear().await?;
        storage.clear().await?;
        assert!(storage.get().await?.is_none());
        Ok(())
    }
}
