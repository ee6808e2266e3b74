#[cfg(test)]
mod tests {
    use jwt_tx_validation_lib::*;
    use num_bigint::{BigUint, RandBigInt};
    use rand::Rng;

    const HEADER_JSON: &str = r#"{"alg":"RS256","kid":"k1","typ":"JWT"}"#;
    const PAYLOAD_JSON: &str =
        r#"{"nonce":"abc","iss":"https://example.com","aud":"client123","sub":"user1"}"#;
    const NONCE_CONTENT: &str =
        "0xdf6f6a92220f473b9f2f25d75029a2f33e4a0dfeeafdfed9e4f498737ab2f37d";

    fn segment(bytes: &ByteVector) -> String {
        bytes.to_base64_url().trim_end_matches('=').to_string()
    }

    fn json_segment(json: &str) -> String {
        segment(&ByteVector::from_ascii(json).unwrap())
    }

    /// A 2048-bit modulus-shaped value: top bit set.
    fn rsa_sized(fill: u8) -> ByteVector {
        let mut bytes = vec![fill; 256];
        bytes[0] |= 0x80;
        ByteVector::new(bytes)
    }

    fn build_token(payload: &str) -> String {
        format!(
            "{}.{}.{}",
            json_segment(HEADER_JSON),
            json_segment(payload),
            segment(&rsa_sized(0x5a))
        )
    }

    fn build_inputs(payload: &str) -> Result<JwtTxValidationInputs, InputError> {
        JwtTxValidationInputs::new(
            &build_token(payload),
            &segment(&rsa_sized(0xc3)),
            "0x01",
            NONCE_CONTENT,
            BigUint::from(5u8),
        )
    }

    #[test]
    fn test_assembled_input_shapes() {
        let data = build_inputs(PAYLOAD_JSON).unwrap().to_signals().unwrap();
        assert_eq!(data.message.len(), 1024);
        assert_eq!(data.pubkey.len(), 17);
        assert_eq!(data.signature.len(), 17);
        assert_eq!(data.expected_iss.len(), 31);
        assert_eq!(data.expected_aud.len(), 100);
        assert_eq!(data.nonce_content_hash.len(), 2);
    }

    #[test]
    fn test_assembled_claim_positions() {
        let data = build_inputs(PAYLOAD_JSON).unwrap().to_signals().unwrap();
        assert_eq!(data.nonce_key_start_index, "1");
        assert_eq!(data.nonce_length, "3");
        assert_eq!(data.iss_key_start_index, "15");
        assert_eq!(data.iss_length, "19");
        assert_eq!(data.aud_key_start_index, "43");
        assert_eq!(data.aud_length, "9");
        assert_eq!(data.sub_key_start_index, "61");
        assert_eq!(data.sub_length, "5");
        assert_eq!(
            data.period_index,
            json_segment(HEADER_JSON).len().to_string()
        );
        assert_eq!(data.salt, "1");
        assert_eq!(data.blinding_factor, "5");
    }

    #[test]
    fn test_assembled_message_is_signed_prefix() {
        let token = build_token(PAYLOAD_JSON);
        let signed = &token[..token.rfind('.').unwrap()];
        let data = build_inputs(PAYLOAD_JSON).unwrap().to_signals().unwrap();

        let message = ByteVector::from_decimal_strings(&data.message).unwrap();
        assert_eq!(&message.as_bytes()[..signed.len()], signed.as_bytes());
        assert_eq!(message.as_bytes()[signed.len()], 0x80);

        let padded_length: usize = data.message_length.parse().unwrap();
        assert_eq!(padded_length, sha256_pad(&ByteVector::from_ascii(signed).unwrap()).len());
        assert_eq!(padded_length % 64, 0);
        assert!(message.as_bytes()[padded_length..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_assembled_limbs_rebuild_modulus() {
        let data = build_inputs(PAYLOAD_JSON).unwrap().to_signals().unwrap();
        let limbs: Vec<BigUint> = data.pubkey.iter().map(|l| l.parse().unwrap()).collect();
        assert_eq!(from_limbs(&limbs, 121), rsa_sized(0xc3).to_biguint());
        let limit = BigUint::from(1u8) << 121;
        assert!(limbs.iter().all(|l| *l < limit));
    }

    #[test]
    fn test_assembled_digest_matches_gadget_input() {
        let data = build_inputs(PAYLOAD_JSON).unwrap().to_signals().unwrap();
        let gadget = DigestCheckInput::new(
            "https://example.com",
            "client123",
            "user1",
            ByteVector::new(vec![1]),
        )
        .to_signals()
        .unwrap();
        assert_eq!(data.oidc_digest, gadget.oidc_digest);
        assert_eq!(data.expected_iss, gadget.expected_iss);
        assert_eq!(data.expected_aud, gadget.expected_aud);
    }

    #[test]
    fn test_assembled_json_keys() {
        let data = build_inputs(PAYLOAD_JSON).unwrap().to_signals().unwrap();
        let json = serde_json::to_value(&data).unwrap();
        let object = json.as_object().unwrap();
        for key in [
            "message",
            "messageLength",
            "pubkey",
            "signature",
            "periodIndex",
            "nonceKeyStartIndex",
            "nonceLength",
            "issKeyStartIndex",
            "issLength",
            "expectedIss",
            "audKeyStartIndex",
            "audLength",
            "expectedAud",
            "subKeyStartIndex",
            "subLength",
            "salt",
            "oidcDigest",
            "nonceContentHash",
            "blindingFactor",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object.len(), 19);
        assert!(object["message"].as_array().unwrap().iter().all(|v| v.is_string()));
    }

    #[test]
    fn test_nonce_too_long() {
        let payload = format!(
            r#"{{"nonce":"{}","iss":"i","aud":"a","sub":"s"}}"#,
            "n".repeat(45)
        );
        let err = build_inputs(&payload).unwrap().to_signals().unwrap_err();
        assert!(matches!(
            err,
            InputError::NonceTooLong { length: 45, max: 44 }
        ));
    }

    #[test]
    fn test_two_segment_token_is_rejected() {
        let raw = format!("{}.{}", json_segment(HEADER_JSON), json_segment(PAYLOAD_JSON));
        let err = JwtTxValidationInputs::new(&raw, "AQAB", "0x01", NONCE_CONTENT, BigUint::from(1u8))
            .unwrap_err();
        assert!(matches!(
            err,
            InputError::Token(TokenError::MissingSegment("signature"))
        ));
    }

    #[test]
    fn test_token_nonce_verifies() {
        let blinding = BigUint::from(0xdead_beefu64);
        let nonce = create_nonce_b64(NONCE_CONTENT, &blinding, &ProtocolConfig::V1).unwrap();
        let payload = format!(
            r#"{{"nonce":"{nonce}","iss":"https://example.com","aud":"client123","sub":"user1"}}"#
        );
        let inputs = JwtTxValidationInputs::new(
            &build_token(&payload),
            &segment(&rsa_sized(0xc3)),
            "0x01",
            NONCE_CONTENT,
            blinding.clone(),
        )
        .unwrap();

        let claimed = &inputs.jwt().claims().nonce;
        assert!(verify_nonce(claimed, NONCE_CONTENT, &blinding, &ProtocolConfig::V1).unwrap());
        let data = inputs.to_signals().unwrap();
        assert_eq!(data.nonce_length, "44");
    }

    #[test]
    fn test_random_limb_round_trip() {
        let mut rng = rand::thread_rng();
        for _ in 0..32 {
            let n = rng.gen_biguint(2048);
            let limbs = to_limbs(&n, 121, 17).unwrap();
            assert_eq!(limbs.len(), 17);
            assert_eq!(from_limbs(&limbs, 121), n);
        }
    }

    #[test]
    fn test_random_byte_vector_encodings() {
        let mut rng = rand::thread_rng();
        for _ in 0..32 {
            let len = rng.gen_range(1..300);
            let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let vector = ByteVector::new(bytes.clone());

            assert_eq!(ByteVector::from_hex(&vector.to_hex()).unwrap(), vector);
            assert_eq!(ByteVector::from_base64_url(&vector.to_base64_url()).unwrap(), vector);
            assert_eq!(ByteVector::from_base64_url(&segment(&vector)).unwrap(), vector);

            let significant: Vec<u8> = bytes.iter().copied().skip_while(|&b| b == 0).collect();
            assert_eq!(ByteVector::from_biguint(&vector.to_biguint()).as_bytes(), &significant[..]);
        }
    }

    #[test]
    fn test_random_field_array_reconstruction() {
        let cfg = ProtocolConfig::V1;
        let mut rng = rand::thread_rng();
        for _ in 0..32 {
            let len = rng.gen_range(0..200);
            let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let vector = ByteVector::new(bytes);
            let fields = to_field_array(&vector, &cfg).unwrap();
            assert_eq!(fields.len(), (len + 30) / 31);
            assert!(fields.iter().all(|f| *f < bn254_modulus()));
            assert_eq!(from_field_array(&fields, len, &cfg).unwrap(), vector);
        }
    }

    #[test]
    fn test_address_bound_nonce_in_token() {
        let context = NonceContext {
            sender: "0x1111111111111111111111111111111111111111".parse().unwrap(),
            target: "0x2222222222222222222222222222222222222222".parse().unwrap(),
            passkey_hash: [0x33u8; 32].into(),
            contract_nonce: "1".parse().unwrap(),
            timestamp_limit: "1700000000".parse().unwrap(),
        };
        let blinding = BigUint::from(77u8);
        let (content, nonce) = create_nonce_v2(&context, &blinding, &ProtocolConfig::V1).unwrap();
        assert_eq!(content, format!("0x{}", hex::encode(keccak256(&context.abi_encode()))));

        let payload = format!(r#"{{"nonce":"{nonce}","iss":"i","aud":"a","sub":"s"}}"#);
        let data = JwtTxValidationInputs::new(
            &build_token(&payload),
            &segment(&rsa_sized(0xc3)),
            "0x2a",
            &content,
            blinding,
        )
        .unwrap()
        .to_signals()
        .unwrap();
        let expected = create_nonce_v2(&context, &BigUint::from(77u8), &ProtocolConfig::V1)
            .unwrap()
            .0;
        let fields = NonceCheckInput::new(&expected, BigUint::from(77u8))
            .to_signals()
            .unwrap()
            .nonce_content;
        assert_eq!(data.nonce_content_hash, fields);
        assert_eq!(data.salt, "42");
    }
}
