//! Terse macros for everyday usage

/// Build an [`OptionSet`](crate::cmd::OptionSet).
///
/// `"name" => value` sets a value, a lone `"name"` adds a bare flag:
///
/// ```
/// let opts = zenity::zx_opts!("width" => "400", "no-wrap");
/// assert_eq!(opts.get("no-wrap"), Some(None));
/// ```
#[macro_export]
macro_rules! zx_opts {
    (@one $o:ident, $k:literal => $v:expr) => { $o.set($k, $v); };
    (@one $o:ident, $k:literal) => { $o.flag($k); };
    () => { $crate::cmd::OptionSet::new() };
    ( $( $k:literal $( => $v:expr )? ),* $(,)? ) => {{
        let mut __o = $crate::cmd::OptionSet::new();
        $( $crate::zx_opts!(@one __o, $k $( => $v )?); )*
        __o
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn mixes_values_and_flags() {
        let width = 400.to_string();
        let o = zx_opts!("width" => width, "no-wrap", "title" => "T",);
        let got: Vec<_> = o.iter().collect();
        assert_eq!(got, vec![("width", Some("400")), ("no-wrap", None), ("title", Some("T"))]);
        assert!(zx_opts!().is_empty());
    }
}
