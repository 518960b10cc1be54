// Hero availability checks shared by manual and forced selection.

/// The four slot arrays of a run, in blue-bans, red-bans, blue-picks,
/// red-picks order.
pub type SlotGroups<'a> = [&'a [Option<String>]; 4];

/// Iterate the heroes already committed to any slot.
pub fn used_heroes<'a>(slots: SlotGroups<'a>) -> impl Iterator<Item = &'a str> {
    slots.into_iter().flatten().filter_map(|s| s.as_deref())
}

/// True iff `hero` belongs to the configured pool and is not yet committed
/// to any slot. Both the manual and the timeout-forced selection paths go
/// through this check.
pub fn is_available(hero: &str, pool: &[String], slots: SlotGroups<'_>) -> bool {
    pool.iter().any(|h| h == hero) && !used_heroes(slots).any(|used| used == hero)
}

/// The heroes still selectable, in pool order.
pub fn available_heroes<'a>(pool: &'a [String], slots: SlotGroups<'a>) -> Vec<&'a str> {
    let used: Vec<&str> = used_heroes(slots).collect();
    pool.iter()
        .map(String::as_str)
        .filter(|hero| !used.contains(hero))
        .collect()
}
