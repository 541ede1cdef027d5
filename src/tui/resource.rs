/// Load state of a registered screen.
///
/// Inspired by Elm's RemoteData pattern, this enum represents the four states
/// of an asynchronous load:
/// - NotAsked: built but never loaded
/// - Loading: a load is in flight
/// - Success: loaded and rendered, holding the render status
/// - Failure: the last load failed, holding the error text
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resource<T, E = String> {
    NotAsked,
    Loading,
    Success(T),
    Failure(E),
}

impl<T, E> Resource<T, E> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Resource::Success(_))
    }
}
