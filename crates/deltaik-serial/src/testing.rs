/// Run a recorded serial transcript through the decoder.
///
/// Lines starting with `>` are bytes sent to the controller, with the
/// marker and one following space stripped and line breaks dropped. Lines
/// starting with `<` list the rendered events expected, one per line.
/// Anything else is a comment.
pub fn check_transcript(name: &str, transcript: &str) {
    let mut input = String::new();
    let mut expected = Vec::new();
    for line in transcript.lines() {
        if let Some(rest) = line.strip_prefix('>') {
            input.push_str(rest.strip_prefix(' ').unwrap_or(rest));
        } else if let Some(rest) = line.strip_prefix('<') {
            expected.push(rest.trim().to_string());
        }
    }

    let actual: Vec<String> = crate::decode(input.as_bytes())
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(actual, expected, "transcript {name}");
}
