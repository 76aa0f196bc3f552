//! Entity Synonym Mapper
//!
//! Resolves entity values extracted from Vietnamese utterances to canonical
//! values. Exact synonyms learned from training data win; otherwise the value
//! is fuzzily ranked against every known canonical value and accepted above a
//! configured threshold, or explicitly marked unresolved.
//!
//! # Usage
//!
//! ```
//! use entity_synonyms::{EntityOccurrence, EntitySynonymMapper, MapperConfig, Message, TrainingData};
//!
//! let data = TrainingData::from_json_str(
//!     r#"{"entity_synonyms": [{"value": "ao", "synonyms": ["áo dài"]}]}"#,
//! )?;
//! let mut mapper = EntitySynonymMapper::new(MapperConfig::default(), None)?;
//! mapper.train(&data);
//!
//! let mut message = Message::new(
//!     "cho xem Áo Dài",
//!     vec![EntityOccurrence::new("inform#object_type", "Áo Dài")],
//! );
//! mapper.process(&mut message);
//! assert_eq!(message.entities[0].value, "ao");
//! assert_eq!(message.entities[0].confidence, Some(1.0));
//! # Ok::<(), entity_synonyms::SynonymError>(())
//! ```

pub mod config;
pub mod error;
pub mod mapper;
pub mod message;
pub mod synonyms;
pub mod training;

pub use config::MapperConfig;
pub use error::{Result, SynonymError};
pub use mapper::{EntitySynonymMapper, PersistedMeta, TrainingReport, COMPONENT_NAME};
pub use message::{EntityOccurrence, Message};
pub use synonyms::{Candidate, Outcome, Resolution, SynonymConflict, SynonymTable};
pub use training::{EntitySpan, SynonymGroup, TrainingData, TrainingExample};
