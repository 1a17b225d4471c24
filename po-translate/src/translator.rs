//! The translation backend capability.
//!
//! A [`Translator`] turns source strings into target-language strings. It is
//! best-effort by contract: implementations recover from their own failures
//! by handing the input back unchanged, so callers never see an error from a
//! translation call.

use std::{thread, time::Duration};

use tracing::warn;

/// Default pause between single-string calls made by the default
/// [`Translator::translate_batch`].
pub const DEFAULT_ITEM_PAUSE: Duration = Duration::from_millis(100);

pub trait Translator {
    /// Translate one string. On failure, returns `text` unchanged.
    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String;

    /// Translate several strings, returning one result per input, in order.
    ///
    /// The default calls [`Translator::translate`] for each item, pausing
    /// [`Translator::item_pause`] between calls. Services with a multi-item
    /// endpoint override this.
    fn translate_batch(&self, texts: &[String], source_lang: &str, target_lang: &str) -> Vec<String> {
        let pause = self.item_pause();
        let mut results = Vec::with_capacity(texts.len());
        for (index, text) in texts.iter().enumerate() {
            if index > 0 && !pause.is_zero() {
                thread::sleep(pause);
            }
            results.push(self.translate(text, source_lang, target_lang));
        }
        results
    }

    /// Pause between single-string calls in the default batch implementation.
    fn item_pause(&self) -> Duration {
        DEFAULT_ITEM_PAUSE
    }
}

impl<T: Translator + ?Sized> Translator for Box<T> {
    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        (**self).translate(text, source_lang, target_lang)
    }

    fn translate_batch(&self, texts: &[String], source_lang: &str, target_lang: &str) -> Vec<String> {
        (**self).translate_batch(texts, source_lang, target_lang)
    }

    fn item_pause(&self) -> Duration {
        (**self).item_pause()
    }
}

/// Force a backend response to line up with its request: missing tail
/// positions are filled with the corresponding input, extra results are
/// dropped.
pub fn reconcile(mut results: Vec<String>, inputs: &[String]) -> Vec<String> {
    if results.len() != inputs.len() {
        warn!(
            expected = inputs.len(),
            received = results.len(),
            "translation count mismatch, reconciling with source texts"
        );
    }
    results.truncate(inputs.len());
    let received = results.len();
    results.extend(inputs[received..].iter().cloned());
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recording {
        calls: RefCell<Vec<String>>,
    }

    impl Translator for Recording {
        fn translate(&self, text: &str, _source_lang: &str, target_lang: &str) -> String {
            self.calls.borrow_mut().push(text.to_string());
            format!("[{}] {}", target_lang, text)
        }

        fn item_pause(&self) -> Duration {
            Duration::ZERO
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_batch_translates_one_by_one() {
        let translator = Recording {
            calls: RefCell::new(Vec::new()),
        };
        let results = translator.translate_batch(&strings(&["a", "b", "c"]), "en", "sv");
        assert_eq!(results, strings(&["[sv] a", "[sv] b", "[sv] c"]));
        assert_eq!(*translator.calls.borrow(), strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_default_batch_of_nothing() {
        let translator = Recording {
            calls: RefCell::new(Vec::new()),
        };
        assert!(translator.translate_batch(&[], "en", "sv").is_empty());
        assert!(translator.calls.borrow().is_empty());
    }

    #[test]
    fn test_boxed_translator_delegates() {
        let translator: Box<dyn Translator> = Box::new(Recording {
            calls: RefCell::new(Vec::new()),
        });
        assert_eq!(translator.translate("x", "en", "de"), "[de] x");
        assert_eq!(translator.item_pause(), Duration::ZERO);
    }

    #[test]
    fn test_reconcile_pads_with_inputs() {
        let inputs = strings(&["one", "two", "three"]);
        assert_eq!(
            reconcile(strings(&["ett"]), &inputs),
            strings(&["ett", "two", "three"])
        );
        assert_eq!(reconcile(Vec::new(), &inputs), inputs);
    }

    #[test]
    fn test_reconcile_truncates_extra() {
        let inputs = strings(&["one"]);
        assert_eq!(reconcile(strings(&["ett", "två"]), &inputs), strings(&["ett"]));
    }

    #[test]
    fn test_reconcile_exact_length_unchanged() {
        let inputs = strings(&["one", "two"]);
        assert_eq!(
            reconcile(strings(&["ett", "två"]), &inputs),
            strings(&["ett", "två"])
        );
    }
}
