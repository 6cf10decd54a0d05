// DER key export
// Serializes a public key into the PKCS#8 PrivateKeyInfo shape carrying
// an RSAPublicKey SEQUENCE under the rsaEncryption algorithm identifier.
// Standalone export utility; the benchmark loop never calls it.

use num_bigint::BigUint;

use super::keygen::RsaPublicKey;

// rsaEncryption, 1.2.840.113549.1.1.1
const OID_RSA_ENCRYPTION: [u8; 9] = [0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01];

const TAG_INTEGER: u8 = 0x02;
const TAG_OCTET_STRING: u8 = 0x04;
const TAG_NULL: u8 = 0x05;
const TAG_OID: u8 = 0x06;
const TAG_SEQUENCE: u8 = 0x30;

/// Encode a public key as DER:
///
/// ```text
/// SEQUENCE {
///   INTEGER 0                                   -- version
///   SEQUENCE {                                  -- AlgorithmIdentifier
///     OBJECT IDENTIFIER 1.2.840.113549.1.1.1    -- rsaEncryption
///     NULL
///   }
///   OCTET STRING {
///     SEQUENCE { INTEGER n, INTEGER e }         -- RSAPublicKey
///   }
/// }
/// ```
pub fn public_key_to_der(key: &RsaPublicKey) -> Vec<u8> {
    let rsa_public_key = der_sequence(&[der_integer(&key.n), der_integer(&key.e)]);

    let algorithm_identifier = der_sequence(&[
        der_tlv(TAG_OID, &OID_RSA_ENCRYPTION),
        der_tlv(TAG_NULL, &[]),
    ]);

    let version = der_tlv(TAG_INTEGER, &[0x00]);
    let wrapped_key = der_tlv(TAG_OCTET_STRING, &rsa_public_key);

    der_sequence(&[version, algorithm_identifier, wrapped_key])
}

/// Tag-length-value with definite length encoding: short form below 128,
/// long form (0x81.., 0x82..) above.
fn der_tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + 4);
    out.push(tag);

    let len = content.len();
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let len_bytes = len.to_be_bytes();
        let skip = len_bytes.iter().take_while(|&&b| b == 0).count();
        let significant = &len_bytes[skip..];
        out.push(0x80 | significant.len() as u8);
        out.extend_from_slice(significant);
    }

    out.extend_from_slice(content);
    out
}

fn der_sequence(parts: &[Vec<u8>]) -> Vec<u8> {
    let content: Vec<u8> = parts.iter().flatten().copied().collect();
    der_tlv(TAG_SEQUENCE, &content)
}

/// Minimal-length unsigned INTEGER: a leading zero byte is added when the
/// high bit of the first content byte is set, so the value is not read
/// back as negative.
fn der_integer(value: &BigUint) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    if bytes[0] & 0x80 != 0 {
        let mut padded = Vec::with_capacity(bytes.len() + 1);
        padded.push(0x00);
        padded.extend_from_slice(&bytes);
        der_tlv(TAG_INTEGER, &padded)
    } else {
        der_tlv(TAG_INTEGER, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::keygen::generate_keypair;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_known_key_vector() {
        // n = 61 * 53 = 3233 (0x0CA1), e = 17 (0x11)
        let key = RsaPublicKey {
            n: BigUint::from(3233u32),
            e: BigUint::from(17u32),
        };

        let expected = hex::decode(
            "301d020100300d06092a864886f70d01010105000409300702020ca1020111",
        )
        .unwrap();
        assert_eq!(public_key_to_der(&key), expected);
    }

    #[test]
    fn test_integer_high_bit_padding() {
        // 0x80 must encode as 02 02 00 80, not as a negative value
        assert_eq!(der_integer(&BigUint::from(0x80u32)), vec![0x02, 0x02, 0x00, 0x80]);
        assert_eq!(der_integer(&BigUint::from(0x7Fu32)), vec![0x02, 0x01, 0x7F]);
    }

    #[test]
    fn test_long_form_length() {
        let content = vec![0xAB; 200];
        let tlv = der_tlv(TAG_OCTET_STRING, &content);
        assert_eq!(&tlv[..3], &[0x04, 0x81, 200]);
        assert_eq!(tlv.len(), 203);
    }

    #[test]
    fn test_generated_key_structure() {
        let mut rng = StdRng::seed_from_u64(40);
        let pair = generate_keypair(&mut rng, 1024, 65537, 20).unwrap();

        let der = public_key_to_der(&pair.public_key);
        assert_eq!(der[0], TAG_SEQUENCE);
        // 1024-bit modulus forces the outer length into long form
        assert_eq!(der[1] & 0x80, 0x80);

        // The rsaEncryption OID must appear verbatim
        let oid_tlv = der_tlv(TAG_OID, &OID_RSA_ENCRYPTION);
        assert!(der
            .windows(oid_tlv.len())
            .any(|window| window == oid_tlv.as_slice()));
    }
}
