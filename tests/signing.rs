//End to end signing of a transaction spending one output of every
//single key type, with keys derived from a BIP32 seed.
//Signatures are checked against libsecp256k1.

use btc_signer::{
    prelude::*,
    script::Command,
    signer,
    transaction::legacy_sighash
};
use std::str::FromStr;

//BIP39 seed of "abandon abandon ... about"
const SEED: &str = "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4";

struct Spend {
    key: PrivKey,
    spent: TransactionOutput
}

fn spends() -> Result<Vec<Spend>> {
    let master = Xprv::from_seed(&hex::decode(SEED).unwrap())?;
    let paths = [
        ("m/44'/1'/0'/0/0", WalletType::P2PKH),
        ("m/84'/1'/0'/0/0", WalletType::P2WPKH),
        ("m/49'/1'/0'/0/0", WalletType::P2SH_P2WPKH),
        ("m/86'/1'/0'/0/0", WalletType::P2TR)
    ];

    paths.iter().enumerate()
        .map(|(i, (path, wallet_type))| -> Result<Spend> {
            let xprv = master.derive_from_path(&Path::from_str(path)?)?;
            let address = Address::from_str(&xprv.get_address(wallet_type, Network::Testnet)?)?;
            Ok(Spend {
                key: xprv.key().clone(),
                spent: TransactionOutput::new(10_000 * (i as u64 + 1), address.script_pubkey())
            })
        })
        .collect()
}

fn unsigned(spends: &[Spend]) -> Result<Transaction> {
    let inputs = (0..spends.len() as u32)
        .map(|vout| OutPoint::from_hex("0f0e64bc96a42058e7fc0c172de37f12bdae1c276c16647a316adcf39248b850", vout)
            .map(|prev_out| TransactionInput::new(prev_out, 0xfffffffd)))
        .collect::<Result<Vec<_>>>()?;
    let change = Address::from_str("tb1q63rv8027mnhszkmf0f5qkxhk48r9tcyk0n6m8l")?;
    Ok(Transaction::new(2, inputs, vec![TransactionOutput::new(95_000, change.script_pubkey())], 0, false))
}

fn sign_all(tx: &mut Transaction, spends: &[Spend]) -> Result<()> {
    let segwit = SegwitV0Context::new(tx);
    let spent: Vec<TransactionOutput> = spends.iter().map(|s| s.spent.clone()).collect();
    let taproot = TaprootContext::new(tx, &spent)?;

    signer::sign_p2pkh(tx, 0, &spends[0].key, true)?;
    signer::sign_p2wpkh(tx, &segwit, 1, &spends[1].key, spends[1].spent.amount)?;
    signer::sign_p2sh_p2wpkh(tx, &segwit, 2, &spends[2].key, spends[2].spent.amount)?;
    signer::sign_p2tr(tx, &taproot, 3, &spends[3].key)
}

fn ecdsa_ok(sighash: [u8; 32], signature: &[u8], public_key: &[u8]) -> bool {
    let secp = secp256k1::Secp256k1::verification_only();
    let message = secp256k1::Message::from_digest(sighash);
    //Strip the sighash type byte
    let signature = secp256k1::ecdsa::Signature::from_der(&signature[..signature.len() - 1]).unwrap();
    let public_key = secp256k1::PublicKey::from_slice(public_key).unwrap();
    secp.verify_ecdsa(&message, &signature, &public_key).is_ok()
}

#[test]
fn spends_every_key_type() -> Result<()> {
    let spends = spends()?;
    let mut tx = unsigned(&spends)?;
    let txid = tx.txid();
    sign_all(&mut tx, &spends)?;

    assert!(tx.segwit);
    //The p2pkh and nested script sigs change the id
    assert_ne!(tx.txid(), txid);

    let tx = Transaction::parse(&tx.serialize())?;
    let segwit = SegwitV0Context::new(&tx);

    //P2PKH: <sig> <pubkey>
    let code = Script::p2pkh(&spends[0].key.public_key().hash160());
    let sighash = legacy_sighash(&tx, 0, &code)?;
    match tx.inputs[0].script_sig.commands() {
        [Command::Data(sig), Command::Data(pk)] => {
            assert!(ecdsa_ok(sighash, sig, pk))
        },
        other => panic!("unexpected p2pkh script sig {:?}", other)
    }

    //P2WPKH and P2SH-P2WPKH share the witness layout
    for index in [1, 2] {
        let key = &spends[index].key;
        let code = Script::p2pkh(&key.public_key().hash160());
        let sighash = segwit.sighash(&tx, index, &code, spends[index].spent.amount)?;
        let items = tx.inputs[index].witness.items();
        assert_eq!(items.len(), 2);
        assert!(ecdsa_ok(sighash, &items[0], &items[1]));
    }
    assert!(tx.inputs[1].script_sig.is_empty());
    assert_eq!(tx.inputs[2].script_sig.serialize().len(), 24);

    //P2TR: one schnorr signature by the output key
    let spent: Vec<TransactionOutput> = spends.iter().map(|s| s.spent.clone()).collect();
    let sighash = TaprootContext::new(&tx, &spent)?.key_path_sighash(&tx, 3)?;
    let output_key = match spends[3].spent.script_pubkey.witness_program() {
        Some((1, program)) => secp256k1::XOnlyPublicKey::from_slice(program).unwrap(),
        other => panic!("unexpected taproot output {:?}", other)
    };
    let items = tx.inputs[3].witness.items();
    assert_eq!(items.len(), 1);
    let signature = secp256k1::schnorr::Signature::from_slice(&items[0]).unwrap();
    let secp = secp256k1::Secp256k1::verification_only();
    assert!(secp.verify_schnorr(&signature, &secp256k1::Message::from_digest(sighash), &output_key).is_ok());
    Ok(())
}

#[test]
fn signing_order_does_not_matter() -> Result<()> {
    //Sign twice in different orders, the ECDSA parts are deterministic
    let spends = spends()?;
    let mut forward = unsigned(&spends)?;
    sign_all(&mut forward, &spends)?;

    let mut backward = unsigned(&spends)?;
    let segwit = SegwitV0Context::new(&backward);
    signer::sign_p2sh_p2wpkh(&mut backward, &segwit, 2, &spends[2].key, spends[2].spent.amount)?;
    signer::sign_p2wpkh(&mut backward, &segwit, 1, &spends[1].key, spends[1].spent.amount)?;
    signer::sign_p2pkh(&mut backward, 0, &spends[0].key, true)?;

    for index in 0..3 {
        assert_eq!(forward.inputs[index], backward.inputs[index]);
    }
    Ok(())
}

#[test]
fn multisig_from_derived_keys() -> Result<()> {
    //2-of-3 P2WSH with cosigner keys from one account
    let account = Xprv::from_seed(&hex::decode(SEED).unwrap())?
        .derive_from_path(&Path::from_str("m/48'/1'/0'/2'")?)?;
    let keys: Vec<PrivKey> = (0..3)
        .map(|i| account.get_xchild(ChildOptions::Normal(i)).map(|x| x.key().clone()))
        .collect::<Result<_>>()?;
    let public_keys: Vec<PubKey> = keys.iter().map(|k| k.public_key().clone()).collect();
    let witness_script = Script::sorted_multisig(2, &public_keys)?;

    //Signatures must follow the key order of the script
    let mut signers: Vec<&PrivKey> = keys.iter().collect();
    signers.sort_by_key(|k| k.public_key().compressed_bytes());

    let spent = Address::p2wsh(&witness_script, Network::Testnet);
    assert!(spent.to_string().starts_with("tb1q"));

    let mut tx = unsigned(&spends()?[..1])?;
    let context = SegwitV0Context::new(&tx);
    signer::partial_sign_p2wsh(&mut tx, &context, 0, signers[0], &witness_script, 100_000)?;
    signer::partial_sign_p2wsh(&mut tx, &context, 0, signers[2], &witness_script, 100_000)?;
    signer::append_witness_script(&mut tx, 0, &witness_script)?;

    let sighash = context.sighash(&tx, 0, &witness_script, 100_000)?;
    let items = tx.inputs[0].witness.items();
    assert_eq!(items.len(), 4);
    assert!(items[0].is_empty());
    assert!(ecdsa_ok(sighash, &items[1], &signers[0].public_key().compressed_bytes()));
    assert!(ecdsa_ok(sighash, &items[2], &signers[2].public_key().compressed_bytes()));
    assert_eq!(Script::parse(&items[3])?.multisig_threshold(), Some((2, 3)));
    Ok(())
}
