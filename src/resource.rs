// File: ./src/resource.rs
//! Status wrapper for values that are derived from the store.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NotInitialized,
    Loading,
    Success,
    Error,
}

/// A value annotated with its loading state.
///
/// `NotInitialized` means there is no conference to load anything for,
/// `Loading` means the conference is known but the data has not arrived yet.
/// A loaded-but-empty list is `Success(vec![])`, never `Loading`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Resource<T> {
    #[default]
    NotInitialized,
    Loading,
    Success(T),
    Error(String),
}

impl<T> Resource<T> {
    pub fn status(&self) -> Status {
        match self {
            Resource::NotInitialized => Status::NotInitialized,
            Resource::Loading => Status::Loading,
            Resource::Success(_) => Status::Success,
            Resource::Error(_) => Status::Error,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Resource::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Resource::Success(_))
    }

    pub fn map<U, F: FnOnce(&T) -> U>(&self, f: F) -> Resource<U> {
        match self {
            Resource::NotInitialized => Resource::NotInitialized,
            Resource::Loading => Resource::Loading,
            Resource::Success(data) => Resource::Success(f(data)),
            Resource::Error(msg) => Resource::Error(msg.clone()),
        }
    }
}

impl<T> From<anyhow::Result<T>> for Resource<T> {
    fn from(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(data) => Resource::Success(data),
            Err(e) => Resource::Error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_keeps_state() {
        let loading: Resource<Vec<i32>> = Resource::Loading;
        assert_eq!(loading.map(|v| v.len()), Resource::Loading);

        let ok = Resource::Success(vec![1, 2, 3]);
        assert_eq!(ok.map(|v| v.len()), Resource::Success(3));

        let err: Resource<Vec<i32>> = Resource::Error("boom".into());
        assert_eq!(err.map(|v| v.len()).message(), Some("boom"));
    }

    #[test]
    fn from_result() {
        let r: Resource<u8> = Err(anyhow::anyhow!("query failed")).into();
        assert_eq!(r.status(), Status::Error);
        assert_eq!(r.message(), Some("query failed"));
        assert_eq!(Resource::from(Ok::<u8, anyhow::Error>(4)).data(), Some(&4));
    }
}
