//! Class-name extraction from field type descriptors and generic signatures.

/// Emit every class name referenced by a field type descriptor or signature.
///
/// Each maximal substring between an `L` and the next `<` or `;` is interpreted as an
/// internal class name and emitted in dotted form. Array-dimension prefixes (`[`) and
/// primitive type codes are passed over, and within generic signatures the same rule
/// applied repeatedly yields each type argument, e.g.
/// `Ljava/util/Map<+Lcom/xyz/Shape;Ljava/lang/Integer;>;` yields `java.util.Map`,
/// `com.xyz.Shape` and `java.lang.Integer`.
pub fn extract_type_names<F: FnMut(String)>(descriptor: &str, mut emit: F) {
    let bytes = descriptor.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'L' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end] != b'<' && bytes[end] != b';' {
                end += 1;
            }
            // 'L', '<', ';' and '/' are all ASCII, so the slice boundaries cannot split
            // a multi-byte character
            let name: String = descriptor[start..end]
                .chars()
                .map(|c| if c == '/' { '.' } else { c })
                .collect();
            emit(name);
            i = end;
        }
        i += 1;
    }
}
