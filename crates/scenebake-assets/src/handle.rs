use std::fmt;
use std::marker::PhantomData;

/// Index of a scene document owned by an [`AssetLoader`](crate::AssetLoader).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub(crate) usize);

impl DocumentId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A typed handle referencing an extracted asset in an AssetLoader.
pub struct AssetHandle<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> AssetHandle<T> {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Position of the asset in its loader's collection.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> fmt::Debug for AssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AssetHandle").field(&self.index).finish()
    }
}

impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AssetHandle<T> {}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> std::hash::Hash for AssetHandle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}
