//! URL-fragment navigation.
//!
//! State lives in the fragment as `#!key1=value1&key2=value2,value3`;
//! encoding escapes only `%` and space (as `+`) so list values keep
//! their raw commas, while decoding accepts any percent-escape. `go`
//! pushes (or replaces) a history entry and notifies listeners; browser
//! back/forward arrives through a `popstate` listener installed by
//! [`HashNavigation::setup`].

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsValue;

use crate::util;

/// Fragment prefix marking a state-carrying hash.
pub const HASH_SEP: &str = "#!";

// Deliberately minimal so fragments stay readable; `%` first, or the
// space replacement would get double-escaped.
fn escape_var(s: &str) -> String {
    s.replace('%', "%25").replace(' ', "+")
}

fn unescape_var(s: &str) -> String {
    let spaced = s.replace('+', "%20");
    match urlencoding::decode(&spaced) {
        Ok(v) => v.into_owned(),
        Err(_) => s.to_string(),
    }
}

/// Encode an ordered list of `(key, optional value)` pairs.
pub fn encode_vars(vars: &[(String, Option<String>)]) -> String {
    let mut out = String::new();
    for (i, (key, value)) in vars.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        out.push_str(&escape_var(key));
        if let Some(value) = value {
            out.push('=');
            out.push_str(&escape_var(value));
        }
    }
    out
}

/// Decode a fragment body back into ordered pairs. Empty segments are
/// skipped; a segment without `=` decodes to a valueless key.
pub fn decode_vars(s: &str) -> Vec<(String, Option<String>)> {
    s.split('&')
        .filter(|seg| !seg.is_empty())
        .map(|seg| match seg.split_once('=') {
            Some((k, v)) => (unescape_var(k), Some(unescape_var(v))),
            None => (unescape_var(seg), None),
        })
        .collect()
}

/// Look up the last occurrence of `key` in decoded pairs.
pub fn find_var<'a>(
    vars: &'a [(String, Option<String>)],
    key: &str,
) -> Option<&'a Option<String>> {
    vars.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// Strip however much of the separator prefix is present.
pub fn strip_hash(hash: &str) -> &str {
    let sep = HASH_SEP.as_bytes();
    let bytes = hash.as_bytes();
    let mut i = 0;
    while i < sep.len() && i < bytes.len() && bytes[i] == sep[i] {
        i += 1;
    }
    &hash[i..]
}

/// Payload delivered to change listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    /// First delivery from `setup`.
    pub init: bool,
    /// Browser back/forward rather than a `go` call.
    pub pop: bool,
}

/// Token returned by [`HashNavigation::on_change`]; pass back to
/// [`HashNavigation::off_change`] to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerToken(usize);

type ChangeCallback = Rc<dyn Fn(&ChangeEvent)>;

struct NavInner {
    listeners: Vec<(usize, ChangeCallback)>,
    next_id: usize,
    _popstate: Option<EventListener>,
}

/// Owned hash-navigation instance; construct one at startup and share by
/// cloning (all clones observe the same listener list).
#[derive(Clone)]
pub struct HashNavigation {
    inner: Rc<RefCell<NavInner>>,
}

impl HashNavigation {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(NavInner {
                listeners: Vec::new(),
                next_id: 0,
                _popstate: None,
            })),
        }
    }

    /// Current fragment body with the separator stripped.
    pub fn current_hash(&self) -> String {
        let hash = util::window().location().hash().unwrap_or_default();
        strip_hash(&hash).to_string()
    }

    pub fn on_change(&self, callback: impl Fn(&ChangeEvent) + 'static) -> ListenerToken {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(callback)));
        ListenerToken(id)
    }

    pub fn off_change(&self, token: ListenerToken) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(id, _)| *id != token.0);
        inner.listeners.len() != before
    }

    /// Install the `popstate` listener and replay the current fragment to
    /// all listeners.
    pub fn setup(&self) {
        let nav = self.clone();
        let listener = EventListener::new(&util::window(), "popstate", move |_| {
            nav.emit(ChangeEvent {
                init: false,
                pop: true,
            });
        });
        self.inner.borrow_mut()._popstate = Some(listener);
        self.emit(ChangeEvent {
            init: true,
            pop: false,
        });
    }

    /// Navigate to a new fragment (`None` clears it). `replace` swaps the
    /// current history entry instead of pushing a new one.
    pub fn go(&self, hash: Option<&str>, replace: bool) {
        let window = util::window();
        let location = window.location();
        let mut url = location.pathname().unwrap_or_default();
        url.push_str(&location.search().unwrap_or_default());
        if let Some(hash) = hash {
            url.push_str(HASH_SEP);
            url.push_str(strip_hash(hash));
        }
        if let Ok(history) = window.history() {
            let result = if replace {
                history.replace_state_with_url(&JsValue::NULL, "", Some(&url))
            } else {
                history.push_state_with_url(&JsValue::NULL, "", Some(&url))
            };
            if result.is_err() {
                util::clog("hashnav: history update failed");
            }
        }
        self.emit(ChangeEvent {
            init: false,
            pop: false,
        });
    }

    fn emit(&self, event: ChangeEvent) {
        // Snapshot so a listener may (un)subscribe during delivery.
        let callbacks: Vec<ChangeCallback> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for cb in callbacks {
            cb(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_pairs() {
        let vars = vec![
            ("sort-by".to_string(), Some("color".to_string())),
            ("tags".to_string(), Some("a,b".to_string())),
        ];
        let encoded = encode_vars(&vars);
        assert_eq!(encoded, "sort-by=color&tags=a,b");
        assert_eq!(decode_vars(&encoded), vars);
    }

    #[test]
    fn commas_in_list_values_stay_raw() {
        let vars = vec![("tags".to_string(), Some("python,library".to_string()))];
        let encoded = encode_vars(&vars);
        assert_eq!(encoded, "tags=python,library");
        assert_eq!(decode_vars(&encoded), vars);
    }

    #[test]
    fn percent_escapes_round_trip() {
        let vars = vec![("q".to_string(), Some("100% done".to_string()))];
        let encoded = encode_vars(&vars);
        assert_eq!(encoded, "q=100%25+done");
        assert_eq!(decode_vars(&encoded), vars);
    }

    #[test]
    fn spaces_encode_as_plus() {
        let vars = vec![("q".to_string(), Some("two words".to_string()))];
        let encoded = encode_vars(&vars);
        assert_eq!(encoded, "q=two+words");
        assert_eq!(decode_vars(&encoded), vars);
    }

    #[test]
    fn valueless_keys_survive() {
        let vars = vec![
            ("tags".to_string(), None),
            ("sort-by".to_string(), Some("name".to_string())),
        ];
        assert_eq!(encode_vars(&vars), "tags&sort-by=name");
        assert_eq!(decode_vars("tags&sort-by=name"), vars);
    }

    #[test]
    fn decode_skips_empty_segments() {
        assert_eq!(decode_vars(""), vec![]);
        assert_eq!(
            decode_vars("&&a=1&"),
            vec![("a".to_string(), Some("1".to_string()))]
        );
    }

    #[test]
    fn strip_hash_trims_partial_separators() {
        assert_eq!(strip_hash("#!tags=a"), "tags=a");
        assert_eq!(strip_hash("#tags=a"), "tags=a");
        assert_eq!(strip_hash("tags=a"), "tags=a");
        assert_eq!(strip_hash(""), "");
    }

    #[test]
    fn find_var_takes_last_occurrence() {
        let vars = decode_vars("a=1&a=2&b");
        assert_eq!(find_var(&vars, "a"), Some(&Some("2".to_string())));
        assert_eq!(find_var(&vars, "b"), Some(&None));
        assert_eq!(find_var(&vars, "c"), None);
    }
}
