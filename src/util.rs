//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
/// The cut is moved back to a char boundary so multibyte input never panics.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_every_occurrence() {
    let out = fill_template("{answer} is {answer}", &[("answer", "b")]);
    assert_eq!(out, "b is b");
  }

  #[test]
  fn fill_template_leaves_unknown_keys_alone() {
    let out = fill_template("keep {other}", &[("answer", "b")]);
    assert_eq!(out, "keep {other}");
  }

  #[test]
  fn trunc_for_log_truncates_only_long_strings() {
    assert_eq!(trunc_for_log("short", 10), "short");
    assert!(trunc_for_log(&"x".repeat(50), 10).contains("50 bytes total"));
  }

  #[test]
  fn trunc_for_log_backs_off_to_a_char_boundary() {
    // 'é' is two bytes and straddles the cut at max=120.
    let mut s = "x".repeat(119);
    s.push('é');
    s.push_str("tail");
    let out = trunc_for_log(&s, 120);
    assert!(out.starts_with(&"x".repeat(119)));
    assert!(!out.contains('é'));
    assert!(out.contains("125 bytes total"));

    // A comment in the submission written with CJK text must not panic either.
    let cjk = format!("mean(mtcars$mpg) # {}", "平均値".repeat(40));
    let cut = trunc_for_log(&cjk, 120);
    assert!(cut.contains("bytes total"));
  }
}
