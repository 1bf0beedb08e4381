//! Name uniquification in the style of `Name`, `Name.001`, `Name.002`, ...

/// Split `Name.001` into (`Name`, 1). Names without a numeric suffix give 0.
pub fn split_name_number(name: &str) -> (&str, u32) {
    if let Some((base, digits)) = name.rsplit_once('.') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(number) = digits.parse::<u32>() {
                return (base, number);
            }
        }
    }
    (name, 0)
}

/// Return `name` if `is_taken` rejects it, otherwise the first free
/// `base.NNN` candidate, counting up from the existing suffix. A suffix that
/// cannot be counted past restarts at `name.001`.
pub fn unique_name(name: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(name) {
        return name.to_string();
    }
    let (mut base, mut number) = split_name_number(name);
    loop {
        number = match number.checked_add(1) {
            Some(next) => next,
            None => {
                base = name;
                1
            }
        };
        let candidate = format!("{base}.{number:03}");
        if !is_taken(&candidate) {
            return candidate;
        }
    }
}
