use serde::{Deserialize, Serialize};

/// Lifecycle of one asynchronous resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AsyncStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl AsyncStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for AsyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{status, data, error}` envelope around any asynchronous resource.
///
/// Single-shot operations use `AsyncState<Option<T>>` so that `data` is
/// absent outside of `success`; the post collection uses
/// `AsyncState<Vec<Post>>` and keeps its last list while reloading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncState<T> {
    pub status: AsyncStatus,
    pub data: T,
    pub error: Option<String>,
}

impl<T: Default> Default for AsyncState<T> {
    fn default() -> Self {
        Self::idle(T::default())
    }
}

impl<T> AsyncState<T> {
    pub fn idle(data: T) -> Self {
        Self {
            status: AsyncStatus::Idle,
            data,
            error: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == AsyncStatus::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status == AsyncStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == AsyncStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == AsyncStatus::Error
    }
}

impl<T> AsyncState<Option<T>> {
    pub fn loading() -> Self {
        Self {
            status: AsyncStatus::Loading,
            data: None,
            error: None,
        }
    }

    pub fn success(data: T) -> Self {
        Self {
            status: AsyncStatus::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: AsyncStatus::Error,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Project the payload, keeping status and error.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AsyncState<Option<U>> {
        AsyncState {
            status: self.status,
            data: self.data.map(f),
            error: self.error,
        }
    }
}
