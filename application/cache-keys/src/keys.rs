use redis_connection::{CacheKey, cache_key};

use crate::{identifier::Identifier, workout::WorkoutLogHash};

cache_key!(LanguageCacheKey => "language-{}"[language: Identifier]);
cache_key!(LanguageConfigCacheKey => "language-config-{}-{}"[language: Identifier, item: str]);
cache_key!(ExerciseMuscleBgCacheKey => "exercise-muscle-bg-{}"[exercise: Identifier]);
cache_key!(IngredientCacheKey => "ingredient-{}"[ingredient: Identifier]);
cache_key!(WorkoutCanonicalCacheKey => "workout-canonical-representation-{}"[workout: Identifier]);
cache_key!(WorkoutLogListCacheKey => "workout-log-hash-{}"[hash: WorkoutLogHash]);

pub fn language_key(language: impl Into<Identifier>) -> String {
    LanguageCacheKey.get_key_with(&language.into()).into_owned()
}

pub fn language_config_key(
    language: impl Into<Identifier>, item: &str,
) -> String {
    LanguageConfigCacheKey
        .get_key_with_args((&language.into(), item))
        .into_owned()
}

pub fn exercise_muscle_bg_key(exercise: impl Into<Identifier>) -> String {
    ExerciseMuscleBgCacheKey
        .get_key_with(&exercise.into())
        .into_owned()
}

pub fn ingredient_key(ingredient: impl Into<Identifier>) -> String {
    IngredientCacheKey.get_key_with(&ingredient.into()).into_owned()
}

pub fn workout_canonical_key(workout: impl Into<Identifier>) -> String {
    WorkoutCanonicalCacheKey
        .get_key_with(&workout.into())
        .into_owned()
}

pub fn workout_log_list_key(hash: &WorkoutLogHash) -> String {
    WorkoutLogListCacheKey.get_key_with(hash).into_owned()
}
