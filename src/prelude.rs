/*
    This module contains the default imports for the library.

    Import the library using:
        use btc_signer::prelude::*;
    to quickly import the essential parts of the library.
*/

pub use crate::{

    key::{
        PubKey,
        PrivKey,
        SchnorrPublicKey,
        Key
    },

    address::Address,

    hdwallet::{
        ChildOptions,
        ExtendedKey,
        KeyKind,
        Xprv, Xpub,
        Path,
        WalletType
    },

    encoding::{
        VersionPrefix,
        ToVersionPrefix
    },

    script::{
        Builder,
        Script,
        ScriptType
    },

    transaction::{
        OutPoint,
        SegwitV0Context,
        TaprootContext,
        Transaction,
        TransactionInput,
        TransactionOutput,
        Witness
    },

    taproot::TapTweak,

    util::Network,

    error::{Error, Result}

};
