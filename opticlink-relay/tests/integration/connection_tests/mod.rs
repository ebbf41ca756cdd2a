mod test_disconnect_releases_role;
