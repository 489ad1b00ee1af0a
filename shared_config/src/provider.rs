//! Figment provider support for [`ConfigStore`].
//!
//! A store can be layered into a [`figment::Figment`] alongside other
//! providers. Only stored data is emitted; environment overrides depend on
//! the key being looked up and are not projected.

use std::collections::BTreeMap;

use figment::{
    Metadata, Profile, Provider,
    error::Kind,
    value::{Dict, Value as FigmentValue},
};

use crate::{ConfigStore, EnvLookup};

const PROVIDER_NAME: &str = "shared_config store";

impl<E: EnvLookup> Provider for ConfigStore<E> {
    fn metadata(&self) -> Metadata {
        match self.source_path() {
            Some(path) => Metadata::from(PROVIDER_NAME, path),
            None => Metadata::named(PROVIDER_NAME),
        }
    }

    fn data(&self) -> Result<BTreeMap<Profile, Dict>, figment::Error> {
        let value = FigmentValue::serialize(self.as_mapping())?;
        let actual = value.to_actual();
        let dict = value
            .into_dict()
            .ok_or_else(|| figment::Error::from(Kind::InvalidType(actual, "map".into())))?;
        Ok(Profile::Default.collect(dict))
    }
}
