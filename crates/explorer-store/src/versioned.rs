// -------------------------------------------------------------------
// Versioned
// -------------------------------------------------------------------

/// A value with a counter bumped on every write, so derived views can tell
/// "same input" from "new input" without comparing contents.
#[derive(Debug, Clone, Default)]
pub struct Versioned<T> {
    version: u64,
    data: T,
}

impl<T> Versioned<T> {
    pub fn new(data: T) -> Self {
        Self { version: 0, data }
    }
    pub fn get(&self) -> &T {
        &self.data
    }
    pub fn get_mut(&mut self) -> &mut T {
        self.version = self.version.wrapping_add(1);
        &mut self.data
    }
    pub fn set(&mut self, data: T) {
        self.data = data;
        self.version = self.version.wrapping_add(1);
    }
    pub fn version(&self) -> u64 {
        self.version
    }
}

// -------------------------------------------------------------------
// Memoized
// -------------------------------------------------------------------

/// A derived value recomputed in full whenever its key changes.
pub struct Memoized<S, K, V> {
    recomputes: u64,
    last: Option<(K, V)>,
    get_key: Box<dyn Fn(&S) -> K>,
    calc: Box<dyn Fn(&S) -> V>,
}

impl<S, K, V> Memoized<S, K, V>
where
    K: PartialEq,
{
    pub fn new(
        get_key: impl Fn(&S) -> K + 'static,
        calc: impl Fn(&S) -> V + 'static,
    ) -> Self {
        Self {
            recomputes: 0,
            last: None,
            get_key: Box::new(get_key),
            calc: Box::new(calc),
        }
    }

    /// Recompute only if the key changed; return the cached value.
    pub fn get<'a>(&'a mut self, source: &S) -> &'a V {
        let key = (self.get_key)(source);
        let stale = !matches!(&self.last, Some((k, _)) if *k == key);
        if stale {
            self.recomputes = self.recomputes.wrapping_add(1);
            self.last = Some((key, (self.calc)(source)));
        }
        match &self.last {
            Some((_, value)) => value,
            None => unreachable!("memoized value populated above"),
        }
    }

    /// Drop the cached value; the next `get` recomputes.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// How many times the value has been computed.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }
}
