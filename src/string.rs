use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref CAMELIZE_SEPARATOR: Regex = Regex::new(r"(\-|_|\.|\s)+(.)?").unwrap();
    static ref CAMELIZE_SEGMENT_START: Regex = Regex::new(r"(^|/)([A-Z])").unwrap();
    static ref CLASSIFY_LEADING: Regex = Regex::new(r"^(\-|_)+(.)?").unwrap();
    static ref CLASSIFY_SEPARATOR: Regex = Regex::new(r"(.)(\-|_|\.|\s)+(.)?").unwrap();
    static ref CLASSIFY_SEGMENT_START: Regex = Regex::new(r"(^|/|\.)([a-z])").unwrap();
}

fn upper(caps: &Captures, group: usize) -> String {
    caps.get(group)
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_default()
}

/// `try-lookup-helper` → `tryLookupHelper`.
pub fn camelize(input: &str) -> String {
    let joined = CAMELIZE_SEPARATOR.replace_all(input, |caps: &Captures| upper(caps, 2));
    CAMELIZE_SEGMENT_START
        .replace_all(&joined, |caps: &Captures| caps[0].to_lowercase())
        .into_owned()
}

/// Turns an identifier into the tag name used to invoke it as a component:
/// `property` → `Property`, `foo-bar` → `FooBar`, `admin/user-card` → `Admin/UserCard`.
pub fn classify(input: &str) -> String {
    let parts: Vec<String> = input
        .split('/')
        .map(|part| {
            let part = CLASSIFY_LEADING.replace_all(part, |caps: &Captures| {
                caps.get(2)
                    .map(|m| format!("_{}", m.as_str().to_uppercase()))
                    .unwrap_or_default()
            });
            CLASSIFY_SEPARATOR
                .replace_all(&part, |caps: &Captures| format!("{}{}", &caps[1], upper(caps, 3)))
                .into_owned()
        })
        .collect();

    CLASSIFY_SEGMENT_START
        .replace_all(&parts.join("/"), |caps: &Captures| caps[0].to_uppercase())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("property"), "Property");
        assert_eq!(classify("foo-bar"), "FooBar");
        assert_eq!(classify("foo_bar"), "FooBar");
        assert_eq!(classify("fooBar"), "FooBar");
        assert_eq!(classify("admin/user-card"), "Admin/UserCard");
        assert_eq!(classify("-private"), "_Private");
    }

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("try-lookup-helper"), "tryLookupHelper");
        assert_eq!(camelize("isComponent"), "isComponent");
        assert_eq!(camelize("Is_component"), "isComponent");
        assert_eq!(camelize("some thing"), "someThing");
    }
}
