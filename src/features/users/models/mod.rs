mod profile;

pub use profile::{
    NewProfile, Profile, ProfileChanges, ProfileFields, ProfileUpsert, PROFILES_TABLE,
};
