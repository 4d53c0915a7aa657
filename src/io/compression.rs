pub fn is_gzipped(header: &[u8]) -> bool {
    header.starts_with(b"\x1f\x8b")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(b"\x1f\x8b\x08\x00"));
        assert!(!is_gzipped(b"<?xml"));
        assert!(!is_gzipped(b"\x1f"));
    }
}
