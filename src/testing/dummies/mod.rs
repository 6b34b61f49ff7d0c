pub mod classifier_none_votes;
