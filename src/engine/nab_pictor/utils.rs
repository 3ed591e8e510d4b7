use std::fmt::Display;
use std::path::Path;

pub trait ShortTypeName
{
    fn short_type_name() -> &'static str;
}
impl<T> ShortTypeName for T
{
    #[inline]
    fn short_type_name() -> &'static str
    {
        let type_name = std::any::type_name::<T>();
        match type_name.rfind(':')
        {
            None => type_name,
            Some(i) => &type_name[(i + 1)..]
        }
    }
}

// Join the display strings of all items with a separator
pub fn join_display<I>(separator: &str, iter: I) -> String
where I: IntoIterator,
      I::Item: Display
{
    let mut out = String::new();
    let mut first = true;
    for i in iter
    {
        match first
        {
            true => { first = false; }
            false => { out.push_str(separator); }
        };
        out.push_str(&i.to_string());
    }
    out
}

// File name without its extension, or an empty string for paths without one
#[must_use]
pub fn file_stem_lossy(path: impl AsRef<Path>) -> String
{
    path.as_ref().file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
