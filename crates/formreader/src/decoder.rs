use percent_encoding::percent_decode;

/// Turns an accumulated raw token into its decoded text and clears the
/// accumulator in place for the next token.
///
/// Literal `+` becomes a space before percent decoding, so an encoded `%2B`
/// survives as a plus sign. Malformed percent sequences pass through
/// undecoded and invalid UTF-8 becomes U+FFFD, matching standard URI
/// unescaping; there is no stricter validation layer above this.
pub(crate) fn decode_word(raw: &mut Vec<u8>) -> String {
    for byte in raw.iter_mut() {
        if *byte == b'+' {
            *byte = b' ';
        }
    }
    let word = percent_decode(raw).decode_utf8_lossy().into_owned();
    raw.clear();
    word
}
