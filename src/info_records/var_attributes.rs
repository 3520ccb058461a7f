use crate::constants::Role;
use crate::io_utils;

/// Subtype 18: variable attributes, with the role list post-parsed.
///
/// The raw payload is kept verbatim; attribute grammar beyond roles is
/// not interpreted.
#[derive(Debug, Clone)]
pub struct VarAttributes {
    pub raw: Vec<u8>,
    /// (variable name, role) pairs in payload order.
    pub roles: Vec<(String, Role)>,
}

/// Parse subtype 18. Roles are extracted by stripping newline bytes,
/// splitting the payload on '/', then splitting each entry on ':' into a
/// variable name and a `$@Role('<digit>')` suffix.
pub fn parse_var_attributes(data: &[u8]) -> VarAttributes {
    let stripped: Vec<u8> = data.iter().copied().filter(|&b| b != 0x0A).collect();
    let text = io_utils::bytes_to_string_lossy(&stripped);

    let mut roles = Vec::new();
    for entry in text.split('/') {
        let Some((name, suffix)) = entry.split_once(':') else {
            continue;
        };
        let Some(role) = parse_role_suffix(suffix) else {
            continue;
        };
        roles.push((name.to_string(), role));
    }

    VarAttributes {
        raw: data.to_vec(),
        roles,
    }
}

fn parse_role_suffix(suffix: &str) -> Option<Role> {
    let digits = suffix.strip_prefix("$@Role('")?.strip_suffix("')")?;
    let digit: u8 = digits.parse().ok()?;
    Role::from_digit(digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles() {
        let data = b"X:$@Role('0')/Y:$@Role('1')/Z:$@Role('5')";
        let attrs = parse_var_attributes(data);

        assert_eq!(
            attrs.roles,
            vec![
                ("X".to_string(), Role::Input),
                ("Y".to_string(), Role::Output),
                ("Z".to_string(), Role::Split),
            ]
        );
    }

    #[test]
    fn test_newlines_stripped() {
        let data = b"A:$@Role('2')/\nB:$@Role('3')";
        let attrs = parse_var_attributes(data);
        assert_eq!(
            attrs.roles,
            vec![
                ("A".to_string(), Role::Both),
                ("B".to_string(), Role::None),
            ]
        );
    }

    #[test]
    fn test_non_role_entries_skipped() {
        let data = b"A:$@Role('0')/B:other('x')/plain";
        let attrs = parse_var_attributes(data);
        assert_eq!(attrs.roles, vec![("A".to_string(), Role::Input)]);
        assert_eq!(attrs.raw, data.to_vec());
    }
}
